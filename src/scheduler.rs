use futures::prelude::*;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

/// The single text display the scenarios render to
pub trait TextView: Send + 'static {
    fn set_text(&mut self, text: &str);
}

type Job = Box<dyn FnOnce(&mut dyn TextView) + Send>;

/// Handle for posting work onto the foreground [`Looper`]
///
/// Jobs run one at a time, in the order they were posted.
#[derive(Clone)]
pub struct MainThread {
    tx: mpsc::UnboundedSender<Job>,
}

impl std::fmt::Debug for MainThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainThread")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl MainThread {
    /// Create the foreground handle and the looper that owns `view`
    pub fn new<V: TextView>(view: V) -> (Self, Looper<V>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, Looper { rx, view })
    }

    /// Run `func` on the looper, resolving to its result
    ///
    /// Resolves to `None` if the looper is no longer running.
    pub fn call<F, T>(&self, func: F) -> impl Future<Output = Option<T>> + Send + 'static
    where
        F: FnOnce(&mut dyn TextView) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move |view| {
            let _ = tx.send(func(view));
        });

        let posted = self.tx.send(job).is_ok();
        if !posted {
            log::warn!("looper has stopped, dropping job");
        }
        async move {
            if !posted {
                return None;
            }
            rx.await.ok()
        }
    }
}

/// The foreground context: drains posted jobs against the owned view
pub struct Looper<V> {
    rx: mpsc::UnboundedReceiver<Job>,
    view: V,
}

impl<V: TextView> Looper<V> {
    /// Run until every [`MainThread`] handle is gone, then hand the view back
    pub async fn run(mut self) -> V {
        log::debug!("looper started");
        while let Some(job) = self.rx.recv().await {
            let view: &mut dyn TextView = &mut self.view;
            job(view);
        }
        log::debug!("looper stopped");
        self.view
    }
}

/// A [`TextView`] that writes each update to stdout
pub struct ConsoleView<W = std::io::Stdout> {
    start: Instant,
    out: W,
    current: String,
}

impl ConsoleView {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: std::io::Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self {
            start: Instant::now(),
            out,
            current: String::new(),
        }
    }

    /// The text currently displayed
    pub fn text(&self) -> &str {
        &self.current
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: std::io::Write + Send + 'static> TextView for ConsoleView<W> {
    fn set_text(&mut self, text: &str) {
        let elapsed = self.start.elapsed();
        log::debug!("text: {:?} after {:.2?}", text, elapsed);
        if let Err(err) = writeln!(self.out, "[{:>6.2}s] {}", elapsed.as_secs_f64(), text) {
            log::error!("cannot write to the view: {}", err);
        }
        self.current.clear();
        self.current.push_str(text);
    }
}
