//! One-shot connection provisioning.

use tabled::Tabled;

use flowgate_core::{Catalog, Connection, ConnectionManager, CreateReport, FlowResult};

use crate::cli::{ConnectArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct FlowResultRow {
    #[tabled(rename = "Flow")]
    name: String,
    #[tabled(rename = "Switch")]
    switch: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl FlowResultRow {
    pub(crate) fn new(r: &FlowResult, color: bool) -> Self {
        Self {
            name: r.flow_name.clone(),
            switch: r.switch_id.clone(),
            result: output::outcome_cell(r.ok, color),
            error: r.error.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct ConnectionRow {
    #[tabled(rename = "Handler")]
    handler: String,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Hops")]
    hops: usize,
    #[tabled(rename = "Rules")]
    rules: usize,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Connection> for ConnectionRow {
    fn from(c: &Connection) -> Self {
        Self {
            handler: c.handler.clone(),
            student: c.student.name.clone(),
            server: c.server.name.clone(),
            service: format!("{} {}/{}", c.service.name, c.service.protocol, c.service.port),
            hops: c.route.len(),
            rules: c.installed_flows.len(),
            status: c.status.to_string(),
            created: c.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

pub(crate) fn render_report(report: &CreateReport, global: &GlobalOpts) -> String {
    let color = output::should_color(&global.color);
    output::render_single(
        &global.output,
        report,
        |r| {
            let rows: Vec<FlowResultRow> =
                r.results.iter().map(|res| FlowResultRow::new(res, color)).collect();
            format!(
                "Connection {} ({})\n{}",
                r.connection.handler,
                r.connection.status,
                output::render_table(&rows)
            )
        },
        |r| r.connection.handler.clone(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    manager: &ConnectionManager,
    catalog: &Catalog,
    args: ConnectArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let request = catalog.authorize(&args.student, &args.server, &args.service)?;
    let report = manager
        .create(&request.student, &request.server, &request.service)
        .await?;

    let out = render_report(&report, global);
    output::print_output(&out, global.quiet);

    report.ensure_complete()?;
    Ok(())
}
