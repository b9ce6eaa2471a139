use reactive_practice::{args, AsyncService, ConsoleView, MainThread, Orchestrator, Outcome};

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;

    let args::Options {
        scenario,
        config,
        cancel_after,
    } = args::handle_args();

    let (main, looper) = MainThread::new(ConsoleView::stdout());
    let orchestrator = Orchestrator::new(
        AsyncService::new(config.service_delays()),
        config.fixtures(),
        tokio::runtime::Handle::current(),
        main,
    );

    let subscription = orchestrator.run(scenario);
    if let Some(after) = cancel_after {
        let token = subscription.token();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            log::info!("canceling after {:.2?}", after);
            token.cancel();
        });
    }

    // the looper stops once the orchestrator (and its main thread handle) is gone
    let scenario_done = async move {
        let outcome = subscription.join().await;
        drop(orchestrator);
        outcome
    };

    let (outcome, view) = tokio::join!(scenario_done, looper.run());
    match outcome? {
        Outcome::Completed => log::info!("{} finished with: {:?}", scenario, view.text()),
        Outcome::Canceled => log::info!("{} was canceled", scenario),
    }

    Ok(())
}
