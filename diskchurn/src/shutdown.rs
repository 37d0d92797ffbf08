use std::time::Duration;

/// Resolves on the first of SIGINT, SIGTERM or the optional run duration elapsing.
pub async fn stop_signal(limit: Option<Duration>) {
    let deadline = async {
        match limit {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        () = interrupt() => tracing::info!("interrupt received"),
        () = terminate() => tracing::info!("terminate received"),
        () = deadline => tracing::info!("run duration elapsed"),
    }
}

async fn interrupt() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sig) => {
            sig.recv().await;
        }
        Err(err) => {
            tracing::error!(error = %err, "cannot listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duration_limit_resolves() {
        let res = tokio::time::timeout(
            Duration::from_secs(5),
            stop_signal(Some(Duration::from_millis(10))),
        )
        .await;
        assert!(res.is_ok());
    }
}
