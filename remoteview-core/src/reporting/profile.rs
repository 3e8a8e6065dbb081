use super::{ReportError, Reporter};
use crate::stat::Stat;
use chrono::Utc;
use std::future::Future;

/// Emit a logger `info` stat.
pub async fn info<R>(
    reporter: &mut R,
    message: impl Into<String>,
    reliable: Option<bool>,
) -> Result<(), ReportError>
where
    R: Reporter + ?Sized,
{
    reporter.emit(&Stat::info(message, reliable)).await
}

/// Run `work` between an `enter` and an `exit` profiler stat.
///
/// The `exit` stat is emitted whatever `work` resolves to, including an
/// `Err` value. Reporter failures take precedence over the work's output.
/// If emitting `enter` fails, `work` is never polled and no `exit` follows.
pub async fn profile<R, F>(reporter: &mut R, name: &str, work: F) -> Result<F::Output, ReportError>
where
    R: Reporter + ?Sized,
    F: Future,
{
    let start = Utc::now();
    reporter.emit(&Stat::enter(name, start)).await?;

    let output = work.await;

    reporter.emit(&Stat::exit(name, start, Utc::now())).await?;
    Ok(output)
}
