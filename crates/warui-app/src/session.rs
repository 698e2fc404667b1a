use std::io::{self, BufRead};

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use warui_core::Interlocutor;
use warui_core::chat_log::{RenderAliases, render};

const HELP: &str = "Commands: /log shows the conversation, /clear starts over, /quit exits";

/// Lines typed by the student.
///
/// Read on a plain thread outside the runtime, so a pending read never holds
/// up shutdown after Ctrl+C.
pub fn stdin_lines() -> mpsc::Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);

    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    rx
}

/// Answer student messages until the input ends or /quit
pub async fn chat_loop<I, W>(
    interlocutor: &mut I,
    mut lines: mpsc::Receiver<io::Result<String>>,
    mut out: W,
) -> anyhow::Result<()>
where
    I: Interlocutor + ?Sized,
    W: AsyncWrite + Unpin,
{
    out.write_all(format!("{HELP}\n> ").as_bytes()).await?;
    out.flush().await?;

    while let Some(line) = lines.recv().await {
        let line = line?;
        let output = match line.trim() {
            "" => String::new(),
            "/quit" => break,
            "/help" => format!("{HELP}\n"),
            "/clear" => {
                interlocutor.clear();
                "(conversation cleared)\n".to_string()
            }
            "/log" => {
                let transcript = render(interlocutor.chat_log(), RenderAliases::default());
                format!("{transcript}\n")
            }
            message => match interlocutor.invoke(message).await {
                Ok(reply) => format!("{reply}\n"),
                // nothing was recorded, the student can simply try again
                Err(e) if e.is_transport() => {
                    tracing::error!("Reply failed: {e}");
                    "(no reply, try again)\n".to_string()
                }
                Err(e) => return Err(e.into()),
            },
        };

        out.write_all(format!("{output}> ").as_bytes()).await?;
        out.flush().await?;
    }

    tracing::debug!("Chat loop finished after {} log entries", interlocutor.chat_log().len());
    Ok(())
}
