use std::path::Path;

use crate::app::App;
use crate::output::print_json;
use rolesync_core::report::RunReport;

pub async fn members(
    config_path: &Path,
    batch_size: usize,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let app = App::load(config_path)?;
    let (narrator, writer) = app.narrator();
    let report = {
        let mut service = app.member_service(narrator);
        service.run(batch_size, dry_run).await
    };
    // All narrator handles are gone; wait for the channel sink to flush.
    let _ = writer.await;
    finish(report, json)
}

pub async fn students(
    config_path: &Path,
    start_row: u32,
    batch_size: usize,
    json: bool,
) -> anyhow::Result<()> {
    let app = App::load(config_path)?;
    let (narrator, writer) = app.narrator();
    let report = {
        let service = app.student_service(narrator);
        service.run(start_row, batch_size).await
    };
    let _ = writer.await;
    finish(report, json)
}

fn finish(report: RunReport, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&report)?;
    } else {
        println!(
            "processed {} of {} peeked{}",
            report.processed(),
            report.peeked,
            if report.dry_run { " (dry run)" } else { "" }
        );
    }
    if let Some(reason) = &report.aborted {
        anyhow::bail!("run aborted: {}", serde_json::to_string(reason)?);
    }
    Ok(())
}
