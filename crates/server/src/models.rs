use serde::{Deserialize, Serialize};

// Auth / users

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

// Companies

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub registration_number: String,
    pub registration_date: String,
    pub status: String,
    pub company_type: Option<String>,
    pub description: Option<String>,
    pub industry_classification: Option<String>,
    pub nature_of_business: Option<String>,
    pub nominal_capital: Option<f64>,
    pub shares_issued: Option<i64>,
    pub share_value: Option<f64>,
    pub compliance_status: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CompanySummary {
    pub id: i64,
    pub name: String,
    pub registration_number: String,
    pub registration_date: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: CompanyRow,
    pub directors: Vec<DirectorRow>,
    pub shareholders: Vec<ShareholderRow>,
    pub addresses: Vec<AddressRow>,
    pub contacts: Vec<ContactRow>,
}

/// Whole-object company payload, shared by create and update. Every field
/// submitted replaces the stored value; there are no partial-patch semantics.
#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    pub name: String,
    pub registration_number: String,
    pub registration_date: String,
    pub status: Option<String>,
    pub company_type: Option<String>,
    pub description: Option<String>,
    pub industry_classification: Option<String>,
    pub nature_of_business: Option<String>,
    pub nominal_capital: Option<f64>,
    pub shares_issued: Option<i64>,
    pub share_value: Option<f64>,
    pub compliance_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompanyListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub total: i64,
    pub companies: Vec<CompanySummary>,
}

// Search

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub company: CompanySummary,
    pub directors: Vec<DirectorRow>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct QuickSearchHit {
    pub id: i64,
    pub name: String,
    pub registration_number: String,
}

#[derive(Debug, Serialize)]
pub struct QuickSearchResponse {
    pub results: Vec<QuickSearchHit>,
}

#[derive(Debug, Serialize)]
pub struct GlobalSearchResult {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub url: String,
}

// Child records

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DirectorRow {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub role: Option<String>,
    pub nationality: Option<String>,
    pub appointment_date: Option<String>,
    pub shares: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DirectorRequest {
    pub name: String,
    pub role: Option<String>,
    pub nationality: Option<String>,
    pub appointment_date: Option<String>,
    pub shares: Option<i64>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ShareholderRow {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub percentage: f64,
    pub shares: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ShareholderRequest {
    pub name: String,
    pub percentage: f64,
    pub shares: Option<i64>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FinancialRow {
    pub id: i64,
    pub company_id: i64,
    pub year: i64,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    pub employee_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FinancialRequest {
    pub year: i64,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    pub employee_count: Option<i64>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TenderRow {
    pub id: i64,
    pub company_id: i64,
    pub project_name: String,
    pub amount: Option<f64>,
    pub award_date: Option<String>,
    pub status: Option<String>,
    pub government_entity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TenderRequest {
    pub project_name: String,
    pub amount: Option<f64>,
    pub award_date: Option<String>,
    pub status: Option<String>,
    pub government_entity: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct EncumbranceRow {
    pub id: i64,
    pub company_id: i64,
    pub kind: String,
    pub amount: f64,
    pub registered_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EncumbranceRequest {
    pub kind: String,
    pub amount: f64,
    pub registered_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AddressRow {
    pub id: i64,
    pub company_id: i64,
    pub street: String,
    pub city: String,
    pub country: String,
    pub postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub street: String,
    pub city: String,
    pub country: String,
    pub postal_code: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ContactRow {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub role: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_primary: bool,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub role: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

// People / network

#[derive(Debug, Serialize)]
pub struct PersonCompaniesResponse {
    pub companies: Vec<CompanySummary>,
}

#[derive(Debug, Serialize)]
pub struct NetworkNode {
    pub id: String,
    pub label: String,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct NetworkLink {
    pub source: String,
    pub target: String,
    pub relationship: String,
}

#[derive(Debug, Serialize)]
pub struct NetworkResponse {
    pub nodes: Vec<NetworkNode>,
    pub links: Vec<NetworkLink>,
}

// Admin

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ActivityPoint {
    pub date: String,
    pub companies: i64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_companies: i64,
    pub active_companies: i64,
    pub total_tenders: i64,
    pub total_encumbrances: i64,
    pub recent_activity: Vec<ActivityPoint>,
}
