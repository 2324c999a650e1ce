//! Interactive menu.
//!
//! One catalog and one connection manager live for the whole session.
//! Errors from a single action are reported and the menu carries on.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use dialoguer::{Input, Select};

use flowgate_core::{
    Catalog, ConnectionManager, Course, CourseStatus, Protocol, Server, Service, Student,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::catalog::{CourseRow, ServerRow, StudentRow, course_detail, request_detail};
use super::connect::{ConnectionRow, FlowResultRow, render_report};
use super::util::{self, prompt_err};

// ── Prompt helpers ──────────────────────────────────────────────────

fn choose(prompt: &str, items: &[&str]) -> Result<usize, CliError> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(prompt_err)
}

fn ask(prompt: &str) -> Result<String, CliError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_err)?;
    Ok(value.trim().to_owned())
}

fn ask_optional(prompt: &str) -> Result<Option<String>, CliError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_owned()))
}

fn parse_ip(field: &str, raw: &str) -> Result<Ipv4Addr, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not an IPv4 address"),
    })
}

/// Pick one of `labels`; `None` when the list is empty.
fn pick(prompt: &str, what: &str, labels: &[String]) -> Result<Option<usize>, CliError> {
    if labels.is_empty() {
        println!("No {what} yet.");
        return Ok(None);
    }
    let items: Vec<&str> = labels.iter().map(String::as_str).collect();
    choose(prompt, &items).map(Some)
}

// ── Session ─────────────────────────────────────────────────────────

struct Session<'a> {
    catalog: Catalog,
    manager: &'a ConnectionManager,
    global: &'a GlobalOpts,
    color: bool,
}

const MAIN_MENU: &[&str] = &[
    "Import catalog (YAML)",
    "Export catalog (YAML)",
    "Courses",
    "Students",
    "Servers",
    "Policies",
    "Connections",
    "Exit",
];

pub async fn run(
    manager: &ConnectionManager,
    catalog: Option<Catalog>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut session = Session {
        catalog: catalog.unwrap_or_default(),
        manager,
        global,
        color: output::should_color(&global.color),
    };

    loop {
        let result = match choose("flowgate", MAIN_MENU)? {
            0 => session.import().await,
            1 => session.export(),
            2 => session.courses(),
            3 => session.students(),
            4 => session.servers(),
            5 => session.policies(),
            6 => session.connections().await,
            _ => return Ok(()),
        };
        if let Err(err) = result {
            eprintln!("{:?}", miette::Report::new(err));
        }
    }
}

impl Session<'_> {
    // ── Import / export ──────────────────────────────────────────────

    async fn import(&mut self) -> Result<(), CliError> {
        let path = PathBuf::from(ask("Catalog file to import")?);
        let catalog = Catalog::load(&path)?;

        let existing = self.manager.list().await.len();
        if existing > 0
            && !util::confirm(
                &format!("Importing forgets {existing} recorded connection(s). Continue?"),
                self.global.yes,
            )?
        {
            return Ok(());
        }
        self.manager.clear().await;
        self.catalog = catalog;
        println!(
            "Imported {} course(s), {} student(s), {} server(s).",
            self.catalog.courses().len(),
            self.catalog.students().len(),
            self.catalog.servers().len()
        );
        Ok(())
    }

    fn export(&self) -> Result<(), CliError> {
        let path = PathBuf::from(ask("Export to file")?);
        if path.exists()
            && !util::confirm(
                &format!("Overwrite {}?", path.display()),
                self.global.yes,
            )?
        {
            return Ok(());
        }
        self.catalog.save(&path)?;
        println!("Catalog written to {}", path.display());
        Ok(())
    }

    // ── Pickers ──────────────────────────────────────────────────────

    fn pick_course(&self) -> Result<Option<String>, CliError> {
        let codes: Vec<String> = self.catalog.courses().iter().map(|c| c.code.clone()).collect();
        let labels: Vec<String> = self
            .catalog
            .courses()
            .iter()
            .map(|c| format!("{} {} [{}]", c.code, c.name, c.status))
            .collect();
        Ok(pick("Course", "courses", &labels)?.and_then(|i| codes.get(i).cloned()))
    }

    fn pick_student(&self) -> Result<Option<String>, CliError> {
        let codes: Vec<String> = self.catalog.students().iter().map(|s| s.code.clone()).collect();
        let labels: Vec<String> = self
            .catalog
            .students()
            .iter()
            .map(|s| format!("{} {}", s.code, s.name))
            .collect();
        Ok(pick("Student", "students", &labels)?.and_then(|i| codes.get(i).cloned()))
    }

    fn pick_server(&self) -> Result<Option<String>, CliError> {
        let names: Vec<String> = self.catalog.servers().iter().map(|s| s.name.clone()).collect();
        Ok(pick("Server", "servers", &names)?.and_then(|i| names.get(i).cloned()))
    }

    fn pick_service(&self, server: &str) -> Result<Option<String>, CliError> {
        let names: Vec<String> = self
            .catalog
            .server(server)
            .map(|s| s.services.iter().map(|svc| svc.name.clone()).collect())
            .unwrap_or_default();
        Ok(pick("Service", "services", &names)?.and_then(|i| names.get(i).cloned()))
    }

    // ── Courses ──────────────────────────────────────────────────────

    fn courses(&mut self) -> Result<(), CliError> {
        let items = &[
            "List",
            "Show details",
            "Create",
            "Set status",
            "Enroll student",
            "Unenroll student",
            "Back",
        ];
        match choose("Courses", items)? {
            0 => {
                let rows: Vec<CourseRow> =
                    self.catalog.courses().iter().map(|c| CourseRow::from(c)).collect();
                println!("{}", output::render_table(&rows));
            }
            1 => {
                if let Some(code) = self.pick_course()? {
                    if let Some(course) = self.catalog.course(&code) {
                        println!("{}", course_detail(&self.catalog, course));
                    }
                }
            }
            2 => {
                let code = ask("Course code")?;
                let name = ask("Course name")?;
                self.catalog.add_course(Course::new(code, name))?;
                println!("Course created.");
            }
            3 => {
                if let Some(code) = self.pick_course()? {
                    let status = match choose("Status", &["active", "inactive"])? {
                        0 => CourseStatus::Active,
                        _ => CourseStatus::Inactive,
                    };
                    self.catalog.set_course_status(&code, status)?;
                    println!("Course {code} is now {status}.");
                }
            }
            4 => {
                if let (Some(course), Some(student)) = (self.pick_course()?, self.pick_student()?) {
                    self.catalog.enroll(&course, &student)?;
                    println!("Enrolled {student} in {course}.");
                }
            }
            5 => {
                if let (Some(course), Some(student)) = (self.pick_course()?, self.pick_student()?) {
                    self.catalog.unenroll(&course, &student)?;
                    println!("Removed {student} from {course}.");
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ── Students ─────────────────────────────────────────────────────

    fn students(&mut self) -> Result<(), CliError> {
        match choose("Students", &["List", "Show details", "Add", "Back"])? {
            0 => {
                let rows: Vec<StudentRow> =
                    self.catalog.students().iter().map(|s| StudentRow::from(s)).collect();
                println!("{}", output::render_table(&rows));
            }
            1 => {
                if let Some(code) = self.pick_student()? {
                    if let Some(student) = self.catalog.student(&code) {
                        let courses: Vec<&str> = self
                            .catalog
                            .courses()
                            .iter()
                            .filter(|c| c.enrolls(&code))
                            .map(|c| c.code.as_str())
                            .collect();
                        println!(
                            "{}\nCourses: {}",
                            output::render_table(&[StudentRow::from(student)]),
                            util::join_cell(&courses)
                        );
                    }
                }
            }
            2 => {
                let code = ask("Student code")?;
                let name = ask("Name")?;
                let mac = util::parse_mac(&ask("MAC address")?)?;
                let ip = ask_optional("IPv4 address (empty if unknown)")?
                    .map(|raw| parse_ip("ip", &raw))
                    .transpose()?;
                self.catalog.add_student(Student { code, name, mac, ip })?;
                println!("Student added.");
            }
            _ => {}
        }
        Ok(())
    }

    // ── Servers ──────────────────────────────────────────────────────

    fn servers(&mut self) -> Result<(), CliError> {
        match choose("Servers", &["List", "Show details", "Add server", "Add service", "Back"])? {
            0 => {
                let rows: Vec<ServerRow> =
                    self.catalog.servers().iter().map(|s| ServerRow::from(s)).collect();
                println!("{}", output::render_table(&rows));
            }
            1 => {
                if let Some(name) = self.pick_server()? {
                    if let Some(server) = self.catalog.server(&name) {
                        println!("{}", output::render_table(&[ServerRow::from(server)]));
                    }
                }
            }
            2 => {
                let name = ask("Server name")?;
                let ip = parse_ip("ip", &ask("IPv4 address")?)?;
                let mac = ask_optional("MAC address (empty to look up by IP)")?
                    .map(|raw| util::parse_mac(&raw))
                    .transpose()?;
                self.catalog.add_server(Server {
                    name,
                    ip,
                    mac,
                    services: Vec::new(),
                })?;
                println!("Server added.");
            }
            3 => {
                if let Some(server) = self.pick_server()? {
                    let name = ask("Service name")?;
                    let protocol = match choose("Protocol", &["TCP", "UDP"])? {
                        0 => Protocol::Tcp,
                        _ => Protocol::Udp,
                    };
                    let port: u16 = Input::new()
                        .with_prompt("Port")
                        .interact_text()
                        .map_err(prompt_err)?;
                    self.catalog.add_service(
                        &server,
                        Service {
                            name,
                            protocol,
                            port,
                        },
                    )?;
                    println!("Service added to {server}.");
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ── Policies ─────────────────────────────────────────────────────

    fn policies(&mut self) -> Result<(), CliError> {
        match choose(
            "Policies",
            &["Grant service to course", "Check authorization", "Back"],
        )? {
            0 => {
                let Some(course) = self.pick_course()? else {
                    return Ok(());
                };
                let Some(server) = self.pick_server()? else {
                    return Ok(());
                };
                if let Some(service) = self.pick_service(&server)? {
                    self.catalog.grant(&course, &server, &service)?;
                    println!("{course} may now reach {service} on {server}.");
                }
            }
            1 => {
                let Some(student) = self.pick_student()? else {
                    return Ok(());
                };
                let Some(server) = self.pick_server()? else {
                    return Ok(());
                };
                if let Some(service) = self.pick_service(&server)? {
                    let request = self.catalog.authorize(&student, &server, &service)?;
                    println!("{}", request_detail(&request, self.color));
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ── Connections ──────────────────────────────────────────────────

    async fn pick_connection(&self) -> Result<Option<String>, CliError> {
        let connections = self.manager.list().await;
        let labels: Vec<String> = connections
            .iter()
            .map(|c| {
                format!(
                    "{}  {} → {} ({})",
                    c.handler, c.student.name, c.server.name, c.service.name
                )
            })
            .collect();
        Ok(pick("Connection", "connections", &labels)?
            .and_then(|i| connections.get(i).map(|c| c.handler.clone())))
    }

    async fn connections(&mut self) -> Result<(), CliError> {
        let items = &[
            "Create",
            "List",
            "Recompute route",
            "Retract rules",
            "Delete",
            "Back",
        ];
        match choose("Connections", items)? {
            0 => self.create_connection().await,
            1 => {
                let connections = self.manager.list().await;
                let rows: Vec<ConnectionRow> =
                    connections.iter().map(|c| ConnectionRow::from(c)).collect();
                println!("{}", output::render_table(&rows));
                Ok(())
            }
            2 => {
                if let Some(handler) = self.pick_connection().await? {
                    let updated = self.manager.recompute(&handler).await?;
                    println!(
                        "Route updated: {} hop(s), {} segment(s).",
                        updated.route.len(),
                        updated.segments.len()
                    );
                }
                Ok(())
            }
            3 => {
                if let Some(handler) = self.pick_connection().await? {
                    let results = self.manager.retract(&handler).await?;
                    let rows: Vec<FlowResultRow> = results
                        .iter()
                        .map(|r| FlowResultRow::new(r, self.color))
                        .collect();
                    println!("{}", output::render_table(&rows));
                }
                Ok(())
            }
            4 => self.delete_connection().await,
            _ => Ok(()),
        }
    }

    async fn create_connection(&self) -> Result<(), CliError> {
        let Some(student) = self.pick_student()? else {
            return Ok(());
        };
        let Some(server) = self.pick_server()? else {
            return Ok(());
        };
        let Some(service) = self.pick_service(&server)? else {
            return Ok(());
        };

        let request = self.catalog.authorize(&student, &server, &service)?;
        let report = self
            .manager
            .create(&request.student, &request.server, &request.service)
            .await?;
        println!("{}", render_report(&report, self.global));
        report.ensure_complete()?;
        Ok(())
    }

    async fn delete_connection(&self) -> Result<(), CliError> {
        let Some(handler) = self.pick_connection().await? else {
            return Ok(());
        };
        let connection = self.manager.get(&handler).await?;

        // The requester is the student's current catalog record.
        let student = self
            .catalog
            .student_by_mac(&connection.student.mac)
            .ok_or_else(|| CliError::Unauthorized {
                student: connection.student.name.clone(),
            })?;
        let requester = self
            .catalog
            .authorize(&student.code, &connection.server.name, &connection.service.name)?
            .student;

        if !util::confirm(
            &format!("Delete connection {handler}? Installed rules stay on the switches."),
            self.global.yes,
        )? {
            return Ok(());
        }
        self.manager.delete(&handler, &requester).await?;
        println!("Connection deleted.");
        Ok(())
    }
}
