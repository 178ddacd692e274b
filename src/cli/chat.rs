use std::io::{self, Write};

use anyhow::Result;
use chrono::{DateTime, Local};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::{ChatMessage, ChatSession, ChatView, HttpTransport};

const GREETING: &str = "Namaste! Main Vision, apka AI assistant. Kuch puchna chahenge?";

fn time_of(timestamp: i64) -> String {
    DateTime::from_timestamp_millis(timestamp)
        .map(|ts| ts.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Prints the conversation to a terminal. Write errors are ignored.
struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render(&mut self, message: &ChatMessage) {
        let _ = writeln!(
            self.out,
            "{} • {}\n{}\n",
            message.role.as_str(),
            time_of(message.timestamp),
            message.display_text()
        );
    }

    fn render_error(&mut self, text: &str) {
        let _ = writeln!(
            self.out,
            "assistant • {}\n{}\n",
            Local::now().format("%H:%M"),
            text
        );
    }

    fn clear(&mut self) {
        // Clear the screen and move the cursor home
        let _ = write!(self.out, "\x1B[2J\x1B[1;1H");
        let _ = self.out.flush();
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            let _ = write!(self.out, "...");
        } else {
            // Erase the typing indicator
            let _ = write!(self.out, "\r\x1B[2K");
        }
        let _ = self.out.flush();
    }
}

pub async fn run(server: &str) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let transport = HttpTransport::new(server);
    let mut session = ChatSession::with_greeting(TerminalView { out: io::stdout() }, GREETING);

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) if line.trim() == "/clear" => session.reset(),
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                session.submit(&transport, &line).await;
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
