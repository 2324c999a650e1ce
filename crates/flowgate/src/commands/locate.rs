//! Host attachment lookup.

use flowgate_core::{ConnectionManager, HostLocation};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(loc: &HostLocation) -> String {
    let ips = if loc.ipv4.is_empty() {
        "-".to_owned()
    } else {
        util::join_cell(&loc.ipv4)
    };
    format!(
        "MAC:    {}\nSwitch: {}\nPort:   {}\nIPv4:   {ips}",
        loc.mac, loc.attachment.switch_id, loc.attachment.port
    )
}

pub async fn handle(
    manager: &ConnectionManager,
    mac: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mac = util::parse_mac(mac)?;
    let location = manager.attachments().locate(&mac).await?;
    let out = output::render_single(&global.output, &location, detail, |l| {
        l.attachment.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
