//! Offline catalog command handlers.

use tabled::Tabled;

use flowgate_core::{Catalog, ConnectionRequest, Course, Server, Student};

use crate::cli::{CatalogArgs, CatalogCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct CourseRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Students")]
    students: usize,
    #[tabled(rename = "Servers")]
    servers: String,
}

impl From<&Course> for CourseRow {
    fn from(c: &Course) -> Self {
        let servers: Vec<_> = c.servers.iter().map(|s| s.name.as_str()).collect();
        Self {
            code: c.code.clone(),
            name: c.name.clone(),
            status: c.status.to_string(),
            students: c.students.len(),
            servers: util::join_cell(&servers),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct StudentRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
}

impl From<&Student> for StudentRow {
    fn from(s: &Student) -> Self {
        Self {
            code: s.code.clone(),
            name: s.name.clone(),
            mac: s.mac.to_string(),
            ip: s.ip.map(|ip| ip.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct ServerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Services")]
    services: String,
}

impl From<&Server> for ServerRow {
    fn from(s: &Server) -> Self {
        let services: Vec<_> = s
            .services
            .iter()
            .map(|svc| format!("{} ({}/{})", svc.name, svc.protocol, svc.port))
            .collect();
        Self {
            name: s.name.clone(),
            ip: s.ip.to_string(),
            mac: s.mac.as_ref().map(ToString::to_string).unwrap_or_default(),
            services: util::join_cell(&services),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

pub(crate) fn course_detail(catalog: &Catalog, course: &Course) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    let _ = writeln!(out, "Course:   {} ({})", course.name, course.code);
    let _ = writeln!(out, "Status:   {}", course.status);

    let students: Vec<&Student> = course
        .students
        .iter()
        .filter_map(|code| catalog.student(code))
        .collect();
    let _ = writeln!(out, "\nStudents:");
    let rows: Vec<StudentRow> = students.into_iter().map(StudentRow::from).collect();
    let _ = writeln!(out, "{}", output::render_table(&rows));

    let _ = writeln!(out, "\nServers:");
    for server in &course.servers {
        let _ = writeln!(
            out,
            "  {:<16} {}",
            server.name,
            util::join_cell(&server.allowed_services)
        );
    }
    out
}

fn catalog_summary(catalog: &Catalog) -> String {
    format!(
        "{} course(s), {} student(s), {} server(s)",
        catalog.courses().len(),
        catalog.students().len(),
        catalog.servers().len()
    )
}

pub(crate) fn request_detail(req: &ConnectionRequest, color: bool) -> String {
    format!(
        "Student:    {} ({})\nServer:     {} ({})\nService:    {} {}/{}\nAuthorized: {}",
        req.student.name,
        req.student.mac,
        req.server.name,
        req.server.ip,
        req.service.name,
        req.service.protocol,
        req.service.port,
        output::yes_no_cell(req.student.authorized, color)
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: CatalogArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let catalog = config::load_catalog(cfg, global)?;

    match args.command {
        CatalogCommand::Courses => {
            let out = output::render_list(
                &global.output,
                catalog.courses(),
                |c| CourseRow::from(c),
                |c| c.code.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CatalogCommand::Students => {
            let out = output::render_list(
                &global.output,
                catalog.students(),
                |s| StudentRow::from(s),
                |s| s.code.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CatalogCommand::Servers => {
            let out = output::render_list(
                &global.output,
                catalog.servers(),
                |s| ServerRow::from(s),
                |s| s.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CatalogCommand::Show { course: Some(code) } => {
            let course = catalog.course(&code).ok_or_else(|| CliError::NotFound {
                resource_type: "course".into(),
                identifier: code.clone(),
            })?;
            let out = output::render_single(
                &global.output,
                course,
                |c| course_detail(&catalog, c),
                |c| c.code.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CatalogCommand::Show { course: None } => {
            let out = output::render_single(&global.output, &catalog, catalog_summary, |c| {
                catalog_summary(c)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CatalogCommand::Check(req) => {
            let request = catalog.authorize(&req.student, &req.server, &req.service)?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &request,
                |r| request_detail(r, color),
                |r| r.student.authorized.to_string(),
            );
            output::print_output(&out, global.quiet);
            if request.student.authorized {
                Ok(())
            } else {
                Err(CliError::Unauthorized {
                    student: request.student.name,
                })
            }
        }
    }
}
