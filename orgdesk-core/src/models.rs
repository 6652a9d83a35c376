use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role assigned to an account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl Role {
    /// Parse a role from a string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Category of a supply/leave request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestType {
    Equipment,
    Leave,
    Resources,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::Equipment => write!(f, "Equipment"),
            RequestType::Leave => write!(f, "Leave"),
            RequestType::Resources => write!(f, "Resources"),
        }
    }
}

impl RequestType {
    /// Parse a request type from a string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "equipment" => Some(RequestType::Equipment),
            "leave" => Some(RequestType::Leave),
            "resources" => Some(RequestType::Resources),
            _ => None,
        }
    }
}

/// Status of a request; only `Pending` may transition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "Pending"),
            RequestStatus::Approved => write!(f, "Approved"),
            RequestStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A login-capable account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all accounts
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub verified: bool,
}

/// An organizational department
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub id: u32,
    pub name: String,
    pub description: String,
}

/// An employee record linking an account to a department
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: u32,
    /// External-facing employee code; uniqueness not enforced
    pub employee_id: String,
    /// Reference to Account.id (may dangle after an account delete)
    pub user_id: u32,
    /// Reference to Department.id (may dangle after a department delete)
    pub department_id: u32,
    pub position: String,
    pub hire_date: NaiveDate,
}

/// One line of a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestItem {
    pub name: String,
    pub quantity: u32,
}

/// A supply or leave request submitted by an account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: u32,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub items: Vec<RequestItem>,
    pub status: RequestStatus,
    pub date: NaiveDate,
    /// Requester's email captured at creation, not a live reference
    pub employee_email: String,
}

/// The four record collections, persisted wholesale as one snapshot.
///
/// Collections are kept in insertion order; requests and employees are
/// displayed in that order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Database {
    pub accounts: Vec<Account>,
    pub departments: Vec<Department>,
    pub employees: Vec<Employee>,
    pub requests: Vec<Request>,
}

/// Computes the next id for a collection: `max(existing) + 1`, 1 when empty.
/// Deterministic under the single-writer model.
fn next_id(ids: impl Iterator<Item = u32>) -> u32 {
    ids.max().unwrap_or(0) + 1
}

impl Database {
    /// Creates an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the seed data set used when no snapshot exists: one
    /// verified admin account and two departments.
    pub fn seed() -> Self {
        Self {
            accounts: vec![Account {
                id: 1,
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                email: "admin@example.com".to_string(),
                password: "Password123!".to_string(),
                role: Role::Admin,
                verified: true,
            }],
            departments: vec![
                Department {
                    id: 1,
                    name: "Engineering".to_string(),
                    description: "Software Development".to_string(),
                },
                Department {
                    id: 2,
                    name: "HR".to_string(),
                    description: "Human Resources".to_string(),
                },
            ],
            employees: Vec::new(),
            requests: Vec::new(),
        }
    }

    pub fn next_account_id(&self) -> u32 {
        next_id(self.accounts.iter().map(|a| a.id))
    }

    pub fn next_department_id(&self) -> u32 {
        next_id(self.departments.iter().map(|d| d.id))
    }

    pub fn next_employee_id(&self) -> u32 {
        next_id(self.employees.iter().map(|e| e.id))
    }

    pub fn next_request_id(&self) -> u32 {
        next_id(self.requests.iter().map(|r| r.id))
    }

    /// Gets an account by id
    pub fn account_by_id(&self, id: u32) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Gets a mutable reference to an account by id
    pub fn account_by_id_mut(&mut self, id: u32) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    /// Gets an account by email
    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.email == email)
    }

    /// Gets a mutable reference to an account by email
    pub fn account_by_email_mut(&mut self, email: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.email == email)
    }

    pub fn department_by_id(&self, id: u32) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn department_by_id_mut(&mut self, id: u32) -> Option<&mut Department> {
        self.departments.iter_mut().find(|d| d.id == id)
    }

    pub fn employee_by_id(&self, id: u32) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn employee_by_id_mut(&mut self, id: u32) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| e.id == id)
    }

    pub fn request_by_id(&self, id: u32) -> Option<&Request> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn request_by_id_mut(&mut self, id: u32) -> Option<&mut Request> {
        self.requests.iter_mut().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_empty_collection() {
        let db = Database::new();
        assert_eq!(db.next_account_id(), 1);
        assert_eq!(db.next_department_id(), 1);
        assert_eq!(db.next_employee_id(), 1);
        assert_eq!(db.next_request_id(), 1);
    }

    #[test]
    fn test_next_id_skips_gaps() {
        let mut db = Database::new();
        db.departments.push(Department {
            id: 1,
            name: "A".into(),
            description: "a".into(),
        });
        db.departments.push(Department {
            id: 7,
            name: "B".into(),
            description: "b".into(),
        });

        // max + 1, not count + 1
        assert_eq!(db.next_department_id(), 8);
    }

    #[test]
    fn test_seed_contents() {
        let db = Database::seed();

        assert_eq!(db.accounts.len(), 1);
        let admin = &db.accounts[0];
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.verified);

        assert_eq!(db.departments.len(), 2);
        assert_eq!(db.departments[0].name, "Engineering");
        assert_eq!(db.departments[1].name, "HR");

        assert!(db.employees.is_empty());
        assert!(db.requests.is_empty());
    }

    #[test]
    fn test_snapshot_field_names() {
        let db = Database::seed();
        let json = serde_json::to_value(&db).unwrap();

        // Snapshot keys match the original persisted format
        let admin = &json["accounts"][0];
        assert!(admin.get("firstName").is_some());
        assert!(admin.get("lastName").is_some());
        assert_eq!(admin["role"], "admin");
        assert_eq!(admin["verified"], true);
    }

    #[test]
    fn test_request_serializes_type_key() {
        let req = Request {
            id: 1,
            request_type: RequestType::Equipment,
            items: vec![RequestItem {
                name: "Laptop".into(),
                quantity: 1,
            }],
            status: RequestStatus::Pending,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            employee_email: "user@example.com".into(),
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "Equipment");
        assert_eq!(json["status"], "Pending");
        assert!(json.get("employeeEmail").is_some());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str("User"), Some(Role::User));
        assert_eq!(Role::from_str("manager"), None);
    }

    #[test]
    fn test_request_type_from_str() {
        assert_eq!(RequestType::from_str("leave"), Some(RequestType::Leave));
        assert_eq!(
            RequestType::from_str("Equipment"),
            Some(RequestType::Equipment)
        );
        assert_eq!(RequestType::from_str("vacation"), None);
    }
}
