//! Route trace and segment planning between two hosts.

use tabled::Tabled;

use flowgate_core::{ConnectionManager, FlowSegment, PathPlan};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SegmentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Switch")]
    switch: String,
    #[tabled(rename = "In")]
    in_port: u32,
    #[tabled(rename = "Out")]
    out_port: u32,
}

fn detail(plan: &PathPlan) -> String {
    let hops: Vec<String> = plan
        .route
        .hops()
        .iter()
        .map(|h| format!("{}/{}", h.switch_id, h.port))
        .collect();
    let rows: Vec<SegmentRow> = plan
        .segments
        .iter()
        .enumerate()
        .map(|(index, seg): (usize, &FlowSegment)| SegmentRow {
            index,
            switch: seg.switch_id.clone(),
            in_port: seg.in_port,
            out_port: seg.out_port,
        })
        .collect();
    format!(
        "From:  {}\nTo:    {}\nRoute: {}\n{}",
        plan.src,
        plan.dst,
        hops.join(" → "),
        output::render_table(&rows)
    )
}

pub async fn handle(
    manager: &ConnectionManager,
    src: &str,
    dst: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let src = util::parse_mac(src)?;
    let dst = util::parse_mac(dst)?;
    let plan = manager.trace(&src, &dst).await?;
    if plan.route.is_empty() {
        return Err(CliError::NoRoute {
            src: plan.src.to_string(),
            dst: plan.dst.to_string(),
        });
    }

    let out = output::render_single(&global.output, &plan, detail, |p| {
        p.segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
