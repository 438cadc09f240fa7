//! Question and answer session over the movie rule set.

use movieq_config::Config;
use movieq_core::{Dispatch, RuleRegistry, tokenize};
use std::future::Future;
use std::io::{BufRead, Write};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const WELCOME: &str = "Welcome to the movie database";
const PROMPT: &str = "Your query? ";
const FAREWELL: &str = "da";

/// Input parameters for the Ask command strategy.
#[derive(Debug, Clone)]
pub struct AskInput {
    /// Optional single question (non-interactive mode)
    pub message: Option<String>,
}

/// Strategy for executing the Ask command.
///
/// Loads the configuration, builds the rule set and either answers a single
/// question or runs the interactive loop on stdin.
#[derive(Debug, Clone, Copy)]
pub struct AskStrategy;

impl super::CommandStrategy for AskStrategy {
    type Input = AskInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let registry = super::build_registry(&config)?;
        let mut stdout = std::io::stdout();

        if let Some(question) = input.message {
            answer_once(&registry, &question, &mut stdout, interrupted()).await
        } else {
            let lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
            run_session(&registry, lines, &mut stdout, interrupted()).await
        }
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Read lines on a dedicated thread and forward them over a channel.
///
/// A blocked read cannot be cancelled, so it must not live on the runtime:
/// the thread is detached and dies with the process. Invalid UTF-8 is
/// replaced rather than treated as an error. The channel closes at end of
/// input or on a read error.
fn spawn_line_reader<R>(mut input: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    std::thread::spawn(move || {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf)
                        .trim_end_matches(['\r', '\n'])
                        .to_string();
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read input: {e}");
                    break;
                }
            }
        }
    });

    rx
}

/// Answer one question; `interrupt` cuts a slow answer short.
async fn answer_once<W, I>(
    registry: &RuleRegistry,
    question: &str,
    output: &mut W,
    interrupt: I,
) -> anyhow::Result<()>
where
    W: Write,
    I: Future<Output = ()>,
{
    let tokens = tokenize(question);
    let dispatch = tokio::select! {
        biased;
        () = interrupt => {
            info!("Interrupted while answering");
            Dispatch::Terminate
        }
        dispatch = registry.dispatch(&tokens) => dispatch,
    };

    match dispatch {
        Dispatch::Answers(answers) => {
            for answer in answers {
                writeln!(output, "{answer}")?;
            }
        }
        Dispatch::Terminate => writeln!(output, "{FAREWELL}")?,
    }
    output.flush()?;
    Ok(())
}

/// Prompt for questions until `bye`, end of input or `interrupt`.
///
/// Every way out prints the farewell line.
async fn run_session<W, I>(
    registry: &RuleRegistry,
    mut lines: mpsc::Receiver<String>,
    output: &mut W,
    interrupt: I,
) -> anyhow::Result<()>
where
    W: Write,
    I: Future<Output = ()>,
{
    writeln!(output, "{WELCOME}")?;
    tokio::pin!(interrupt);

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let line = tokio::select! {
            biased;
            () = &mut interrupt => {
                info!("Interrupted");
                writeln!(output)?;
                break;
            }
            line = lines.recv() => line,
        };

        let Some(line) = line else {
            debug!("End of input");
            writeln!(output)?;
            break;
        };

        let tokens = tokenize(&line);
        let dispatch = tokio::select! {
            biased;
            () = &mut interrupt => {
                info!("Interrupted while answering");
                break;
            }
            dispatch = registry.dispatch(&tokens) => dispatch,
        };

        match dispatch {
            Dispatch::Terminate => break,
            Dispatch::Answers(answers) => {
                for answer in answers {
                    writeln!(output, "{answer}")?;
                }
            }
        }
    }

    writeln!(output, "{FAREWELL}")?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use movieq_core::{Action, Farewell, Outcome};
    use std::io::{Cursor, Read};
    use std::sync::Arc;
    use std::time::Duration;

    /// Answers with the captured words, one per line.
    struct Echo;

    #[async_trait]
    impl Action for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn run(&self, captures: &[String]) -> Outcome {
            Outcome::Answers(
                captures
                    .iter()
                    .flat_map(|c| c.split(' '))
                    .filter(|w| !w.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        }
    }

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.register("echo %", Arc::new(Echo)).unwrap();
        registry.register("bye", Arc::new(Farewell)).unwrap();
        registry
    }

    /// Blocks every read until its sender is dropped.
    struct Stalled(std::sync::mpsc::Receiver<()>);

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    async fn session_bytes(input: &[u8]) -> String {
        let mut output = Vec::new();
        let lines = spawn_line_reader(Cursor::new(input.to_vec()));
        run_session(&registry(), lines, &mut output, std::future::pending())
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    async fn session(input: &str) -> String {
        session_bytes(input.as_bytes()).await
    }

    #[tokio::test]
    async fn session_answers_until_bye() {
        let output = session("Echo Hello World?\nwhat\nbye\necho never\n").await;

        assert_eq!(
            output,
            "Welcome to the movie database\n\
             Your query? hello\nworld\n\
             Your query? I don't understand\n\
             Your query? da\n"
        );
    }

    #[tokio::test]
    async fn session_reports_empty_answers() {
        let output = session("echo\nbye\n").await;

        assert_eq!(
            output,
            "Welcome to the movie database\n\
             Your query? No answers\n\
             Your query? da\n"
        );
    }

    #[tokio::test]
    async fn session_ends_at_end_of_input() {
        let output = session("echo one").await;

        assert_eq!(
            output,
            "Welcome to the movie database\n\
             Your query? one\n\
             Your query? \n\
             da\n"
        );
    }

    #[tokio::test]
    async fn session_ends_on_interrupt() {
        let (_tx, rx) = mpsc::channel(1);
        let mut output = Vec::new();
        run_session(&registry(), rx, &mut output, std::future::ready(()))
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Welcome to the movie database\nYour query? \nda\n"
        );
    }

    #[tokio::test]
    async fn interrupt_returns_while_reader_is_blocked() {
        let (hold, stall) = std::sync::mpsc::channel::<()>();
        let lines = spawn_line_reader(std::io::BufReader::new(Stalled(stall)));
        let mut output = Vec::new();

        tokio::time::timeout(
            Duration::from_secs(5),
            run_session(
                &registry(),
                lines,
                &mut output,
                tokio::time::sleep(Duration::from_millis(20)),
            ),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Welcome to the movie database\nYour query? \nda\n"
        );
        drop(hold);
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_session() {
        let output = session_bytes(b"caf\xe9 question\necho caf\xe9\r\nbye\n").await;

        assert_eq!(
            output,
            "Welcome to the movie database\n\
             Your query? I don't understand\n\
             Your query? caf\u{FFFD}\n\
             Your query? da\n"
        );
    }

    #[tokio::test]
    async fn single_question_prints_answers_only() {
        let mut output = Vec::new();
        answer_once(&registry(), "echo a b", &mut output, std::future::pending())
            .await
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "a\nb\n");

        let mut output = Vec::new();
        answer_once(&registry(), "bye", &mut output, std::future::pending())
            .await
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "da\n");
    }

    #[tokio::test]
    async fn interrupted_single_question_says_farewell() {
        let mut output = Vec::new();
        answer_once(&registry(), "echo a b", &mut output, std::future::ready(()))
            .await
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "da\n");
    }
}
