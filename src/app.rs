use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::apis::icanhazdadjoke::{FetchFailed, JokeRecord};
use crate::joke_fetcher::JokeSource;
use crate::screen::JokeScreen;

type FetchResult = Result<JokeRecord, FetchFailed>;
pub type InputLines = mpsc::UnboundedReceiver<io::Result<String>>;

/// Reads stdin on a plain thread; the runtime never owns the blocking read.
pub fn stdin_lines() -> InputLines {
    let (tx, rx) = mpsc::unbounded_channel();

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    rx
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Another,
    Quit,
}

impl Action {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "a" | "another" => Some(Self::Another),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Drives the screen: fetches run as separate tasks and report back over a channel, so only the
/// loop ever touches the displayed joke.
pub struct App {
    source: Arc<dyn JokeSource>,
    screen: JokeScreen,
    in_flight: usize,
    tasks: Vec<JoinHandle<()>>,
    results_tx: mpsc::UnboundedSender<FetchResult>,
    results_rx: mpsc::UnboundedReceiver<FetchResult>,
}

impl App {
    pub fn new(source: Arc<dyn JokeSource>) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        Self {
            source,
            screen: JokeScreen::default(),
            in_flight: 0,
            tasks: Vec::new(),
            results_tx,
            results_rx,
        }
    }

    /// Runs until quit, end of input or `shutdown` completing.
    pub async fn run<W, S>(
        &mut self,
        mut input: InputLines,
        shutdown: S,
        output: &mut W,
    ) -> io::Result<()>
    where
        W: Write,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tokio::select! {
            () = self.load() => self.draw(output)?,
            () = &mut shutdown => return Ok(()),
        }

        loop {
            tokio::select! {
                line = input.recv() => {
                    let Some(line) = line else {
                        break;
                    };
                    let line = match line {
                        Ok(line) => line,
                        Err(err) => {
                            self.close();
                            return Err(err);
                        }
                    };

                    match Action::parse(&line) {
                        Some(Action::Another) => {
                            self.request_another();
                            self.draw(output)?;
                        }
                        Some(Action::Quit) => break,
                        None => {
                            log::debug!("unknown input {line:?}");
                            writeln!(output, "press enter for another joke, or q to quit")?;
                            output.flush()?;
                        }
                    }
                }
                () = self.next_result() => self.draw(output)?,
                () = &mut shutdown => break,
            }
        }

        self.close();
        Ok(())
    }

    /// Initial load: one fetch, awaited before the screen takes input.
    pub async fn load(&mut self) {
        let result = self.source.fetch().await;
        self.screen.apply(result);
    }

    pub fn request_another(&mut self) {
        self.tasks.retain(|task| !task.is_finished());

        let source = self.source.clone();
        let results_tx = self.results_tx.clone();
        self.tasks.push(tokio::spawn(async move {
            results_tx.send(source.fetch().await).ok();
        }));
        self.in_flight += 1;
    }

    /// Waits for the next fetch to complete and applies it to the screen.
    pub async fn next_result(&mut self) {
        if let Some(result) = self.results_rx.recv().await {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.screen.apply(result);
        }
    }

    fn draw<W: Write>(&self, output: &mut W) -> io::Result<()> {
        writeln!(output, "{}", self.screen.render(self.in_flight))?;
        output.flush()
    }

    fn close(&mut self) {
        self.tasks.retain(|task| !task.is_finished());
        if !self.tasks.is_empty() {
            log::info!("abandoning {} unfinished fetch(es)", self.tasks.len());
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}
