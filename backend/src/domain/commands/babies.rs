//! Commands and results for baby profile operations.

use crate::domain::models::baby::Baby;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateBabyCommand {
    pub name: String,
    /// ISO 8601 date format (YYYY-MM-DD)
    pub birthdate: String,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBabyCommand {
    pub baby_id: String,
    pub name: Option<String>,
    pub birthdate: Option<String>,
    /// `Some(None)` clears the due date, `None` leaves it untouched
    pub due_date: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetBabyCommand {
    pub baby_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteBabyCommand {
    pub baby_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetActiveBabyCommand {
    pub baby_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateBabyResult {
    pub baby: Baby,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBabyResult {
    pub baby: Baby,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetBabyResult {
    pub baby: Option<Baby>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListBabiesResult {
    pub babies: Vec<Baby>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteBabyResult {
    pub deleted_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetActiveBabyResult {
    pub baby: Baby,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetActiveBabyResult {
    pub baby: Option<Baby>,
}
