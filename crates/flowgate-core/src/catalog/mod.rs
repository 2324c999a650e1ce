// ── Course catalog ──
//
// In-memory bookkeeping for courses, students, and servers, plus the
// course → server → service grants that decide who may connect where.
// The engine never reads the catalog; it receives the `Host`, `Server`,
// and `Service` records that `authorize` hands out.

mod yaml;

use std::net::Ipv4Addr;

use serde::{Deserialize, Deserializer, Serialize};
use strum::Display;

use crate::error::CoreError;
use crate::model::{Host, MacAddress, Server, Service};

// ── Records ──────────────────────────────────────────────────────────

/// Whether a course is currently being taught. Only active courses grant
/// access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    #[serde(alias = "ACTIVE", alias = "DICTANDO", alias = "dictando")]
    Active,
    #[serde(alias = "INACTIVE", alias = "INACTIVO", alias = "inactivo")]
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(alias = "codigo", deserialize_with = "code")]
    pub code: String,
    #[serde(alias = "nombre")]
    pub name: String,
    pub mac: MacAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<Ipv4Addr>,
}

/// A server as seen from one course: which of its services the course
/// permits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseServer {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "servicios_permitidos")]
    pub allowed_services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(alias = "codigo", deserialize_with = "code")]
    pub code: String,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "estado")]
    pub status: CourseStatus,
    /// Enrolled student codes.
    #[serde(default, alias = "alumnos", deserialize_with = "codes")]
    pub students: Vec<String>,
    #[serde(default, alias = "servidores")]
    pub servers: Vec<CourseServer>,
}

impl Course {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            status: CourseStatus::Active,
            students: Vec::new(),
            servers: Vec::new(),
        }
    }

    pub fn enrolls(&self, student_code: &str) -> bool {
        self.students.iter().any(|c| c == student_code)
    }

    /// Whether this course lets its students reach `service` on `server`.
    pub fn permits(&self, server: &str, service: &str) -> bool {
        self.servers.iter().any(|s| {
            s.name == server
                && s
                    .allowed_services
                    .iter()
                    .any(|svc| svc.eq_ignore_ascii_case(service))
        })
    }
}

/// What `Catalog::authorize` hands to the connection manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionRequest {
    pub student: Host,
    pub server: Server,
    pub service: Service,
}

// ── Catalog ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, alias = "cursos")]
    courses: Vec<Course>,
    #[serde(default, alias = "alumnos")]
    students: Vec<Student>,
    #[serde(default, alias = "servidores")]
    servers: Vec<Server>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Courses ──────────────────────────────────────────────────────

    pub fn add_course(&mut self, course: Course) -> Result<(), CoreError> {
        if self.course(&course.code).is_some() {
            return Err(CoreError::catalog(format!(
                "course '{}' already exists",
                course.code
            )));
        }
        self.check_course_refs(&course)?;
        self.courses.push(course);
        Ok(())
    }

    pub fn course(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.code == code)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn set_course_status(&mut self, code: &str, status: CourseStatus) -> Result<(), CoreError> {
        self.course_mut(code)?.status = status;
        Ok(())
    }

    pub fn enroll(&mut self, course_code: &str, student_code: &str) -> Result<(), CoreError> {
        if self.student(student_code).is_none() {
            return Err(CoreError::not_found("student", student_code));
        }
        let course = self.course_mut(course_code)?;
        if course.enrolls(student_code) {
            return Err(CoreError::catalog(format!(
                "student '{student_code}' is already enrolled in '{course_code}'"
            )));
        }
        course.students.push(student_code.to_owned());
        Ok(())
    }

    pub fn unenroll(&mut self, course_code: &str, student_code: &str) -> Result<(), CoreError> {
        let course = self.course_mut(course_code)?;
        let before = course.students.len();
        course.students.retain(|c| c != student_code);
        if course.students.len() == before {
            return Err(CoreError::not_found(
                "enrollment",
                format!("{student_code} in {course_code}"),
            ));
        }
        Ok(())
    }

    /// Allow students of `course_code` to reach `service_name` on
    /// `server_name`. Granting twice is a no-op.
    pub fn grant(
        &mut self,
        course_code: &str,
        server_name: &str,
        service_name: &str,
    ) -> Result<(), CoreError> {
        let server = self
            .server(server_name)
            .ok_or_else(|| CoreError::not_found("server", server_name))?;
        let service = server
            .service(service_name)
            .ok_or_else(|| CoreError::ServiceNotOffered {
                service: service_name.to_owned(),
                server: server_name.to_owned(),
            })?
            .name
            .clone();

        let course = self.course_mut(course_code)?;
        let entry = match course.servers.iter().position(|s| s.name == server_name) {
            Some(idx) => &mut course.servers[idx],
            None => {
                course.servers.push(CourseServer {
                    name: server_name.to_owned(),
                    allowed_services: Vec::new(),
                });
                course
                    .servers
                    .last_mut()
                    .ok_or_else(|| CoreError::catalog("course server list is empty"))?
            }
        };
        if !entry.allowed_services.contains(&service) {
            entry.allowed_services.push(service);
        }
        Ok(())
    }

    fn course_mut(&mut self, code: &str) -> Result<&mut Course, CoreError> {
        self.courses
            .iter_mut()
            .find(|c| c.code == code)
            .ok_or_else(|| CoreError::not_found("course", code))
    }

    // ── Students ─────────────────────────────────────────────────────

    pub fn add_student(&mut self, student: Student) -> Result<(), CoreError> {
        if self.student(&student.code).is_some() {
            return Err(CoreError::catalog(format!(
                "student '{}' already exists",
                student.code
            )));
        }
        self.students.push(student);
        Ok(())
    }

    pub fn student(&self, code: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.code == code)
    }

    pub fn student_by_mac(&self, mac: &MacAddress) -> Option<&Student> {
        self.students.iter().find(|s| &s.mac == mac)
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    // ── Servers ──────────────────────────────────────────────────────

    pub fn add_server(&mut self, server: Server) -> Result<(), CoreError> {
        if self.server(&server.name).is_some() {
            return Err(CoreError::catalog(format!(
                "server '{}' already exists",
                server.name
            )));
        }
        self.servers.push(server);
        Ok(())
    }

    pub fn server(&self, name: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.name == name)
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn add_service(&mut self, server_name: &str, service: Service) -> Result<(), CoreError> {
        let server = self
            .servers
            .iter_mut()
            .find(|s| s.name == server_name)
            .ok_or_else(|| CoreError::not_found("server", server_name))?;
        if server.service(&service.name).is_some() {
            return Err(CoreError::catalog(format!(
                "server '{server_name}' already offers '{}'",
                service.name
            )));
        }
        server.services.push(service);
        Ok(())
    }

    // ── Policy ───────────────────────────────────────────────────────

    /// Resolve a connection request against the catalog.
    ///
    /// The returned `student.authorized` is true iff some active course
    /// enrolls the student, lists the server, and permits the service.
    pub fn authorize(
        &self,
        student_code: &str,
        server_name: &str,
        service_name: &str,
    ) -> Result<ConnectionRequest, CoreError> {
        let student = self
            .student(student_code)
            .ok_or_else(|| CoreError::not_found("student", student_code))?;
        let server = self
            .server(server_name)
            .ok_or_else(|| CoreError::not_found("server", server_name))?;
        let service = server
            .service(service_name)
            .ok_or_else(|| CoreError::ServiceNotOffered {
                service: service_name.to_owned(),
                server: server_name.to_owned(),
            })?;

        let authorized = self.courses.iter().any(|c| {
            c.status == CourseStatus::Active
                && c.enrolls(&student.code)
                && c.permits(&server.name, &service.name)
        });

        Ok(ConnectionRequest {
            student: Host {
                name: student.name.clone(),
                mac: student.mac.clone(),
                ip: student.ip,
                authorized,
            },
            server: server.clone(),
            service: service.clone(),
        })
    }

    /// Every enrolled code must name a known student and every course
    /// server a known server.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.courses
            .iter()
            .try_for_each(|course| self.check_course_refs(course))
    }

    fn check_course_refs(&self, course: &Course) -> Result<(), CoreError> {
        if let Some(code) = course
            .students
            .iter()
            .find(|code| self.student(code).is_none())
        {
            return Err(CoreError::catalog(format!(
                "course '{}' enrolls unknown student '{code}'",
                course.code
            )));
        }
        if let Some(cs) = course
            .servers
            .iter()
            .find(|cs| self.server(&cs.name).is_none())
        {
            return Err(CoreError::catalog(format!(
                "course '{}' references unknown server '{}'",
                course.code, cs.name
            )));
        }
        Ok(())
    }
}

// ── Serde helpers ────────────────────────────────────────────────────

/// Student codes are often written as bare numbers in data files.
#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Text(String),
    Number(u64),
}

impl From<CodeRepr> for String {
    fn from(code: CodeRepr) -> Self {
        match code {
            CodeRepr::Text(s) => s,
            CodeRepr::Number(n) => n.to_string(),
        }
    }
}

fn code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    CodeRepr::deserialize(deserializer).map(String::from)
}

fn codes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Vec::<CodeRepr>::deserialize(deserializer).map(|v| v.into_iter().map(String::from).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Protocol;

    fn ssh() -> Service {
        Service {
            name: "ssh".into(),
            protocol: Protocol::Tcp,
            port: 22,
        }
    }

    fn http() -> Service {
        Service {
            name: "http".into(),
            protocol: Protocol::Tcp,
            port: 80,
        }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_student(Student {
                code: "20180001".into(),
                name: "Alice".into(),
                mac: MacAddress::new("AA:BB:CC:00:00:01"),
                ip: None,
            })
            .unwrap();
        catalog
            .add_server(Server {
                name: "lab".into(),
                ip: Ipv4Addr::new(10, 0, 0, 2),
                mac: None,
                services: vec![ssh(), http()],
            })
            .unwrap();
        catalog.add_course(Course::new("TEL354", "Redes")).unwrap();
        catalog.enroll("TEL354", "20180001").unwrap();
        catalog.grant("TEL354", "lab", "ssh").unwrap();
        catalog
    }

    #[test]
    fn enrolled_student_is_authorized_for_granted_service() {
        let request = catalog().authorize("20180001", "lab", "ssh").unwrap();
        assert!(request.student.authorized);
        assert_eq!(request.student.mac, MacAddress::new("aa:bb:cc:00:00:01"));
        assert_eq!(request.service, ssh());
    }

    #[test]
    fn ungranted_service_is_not_authorized() {
        let request = catalog().authorize("20180001", "lab", "http").unwrap();
        assert!(!request.student.authorized);
    }

    #[test]
    fn inactive_course_grants_nothing() {
        let mut catalog = catalog();
        catalog
            .set_course_status("TEL354", CourseStatus::Inactive)
            .unwrap();
        let request = catalog.authorize("20180001", "lab", "ssh").unwrap();
        assert!(!request.student.authorized);
    }

    #[test]
    fn unenrolled_student_loses_access() {
        let mut catalog = catalog();
        catalog.unenroll("TEL354", "20180001").unwrap();
        assert!(!catalog.authorize("20180001", "lab", "ssh").unwrap().student.authorized);
        assert!(matches!(
            catalog.unenroll("TEL354", "20180001"),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn unknown_service_is_not_offered() {
        let err = catalog().authorize("20180001", "lab", "rdp").unwrap_err();
        assert!(matches!(err, CoreError::ServiceNotOffered { .. }));
    }

    #[test]
    fn unknown_student_is_not_found() {
        let err = catalog().authorize("99999999", "lab", "ssh").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut catalog = catalog();
        assert!(matches!(
            catalog.add_course(Course::new("TEL354", "Again")),
            Err(CoreError::Catalog { .. })
        ));
        assert!(matches!(
            catalog.enroll("TEL354", "20180001"),
            Err(CoreError::Catalog { .. })
        ));
        assert!(matches!(
            catalog.add_service("lab", ssh()),
            Err(CoreError::Catalog { .. })
        ));
    }

    #[test]
    fn grant_is_idempotent() {
        let mut catalog = catalog();
        catalog.grant("TEL354", "lab", "SSH").unwrap();
        let course = catalog.course("TEL354").unwrap();
        assert_eq!(course.servers.len(), 1);
        assert_eq!(course.servers[0].allowed_services, vec!["ssh".to_owned()]);
    }

    #[test]
    fn course_with_unknown_student_is_rejected() {
        let mut catalog = catalog();
        let mut course = Course::new("TEL999", "Otro");
        course.students.push("404".into());
        assert!(matches!(
            catalog.add_course(course),
            Err(CoreError::Catalog { .. })
        ));
    }
}
