pub mod addresses;
pub mod admin;
pub mod auth;
pub mod companies;
pub mod contacts;
pub mod directors;
pub mod encumbrances;
pub mod financials;
pub mod health;
pub mod people;
pub mod search;
pub mod shareholders;
pub mod tenders;
pub mod users;

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::app_state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/search", get(search::global_search))
        .route("/api/companies", get(companies::list_companies))
        .route("/api/companies", post(companies::create_company))
        .route("/api/companies/search", get(companies::search_companies))
        .route("/api/companies/quick-search", get(companies::quick_search))
        .route("/api/companies/:company_id", get(companies::company_detail))
        .route("/api/companies/:company_id", patch(companies::update_company))
        .route("/api/companies/:company_id", delete(companies::delete_company))
        .route("/api/companies/:company_id/network", get(companies::company_network))
        .route("/api/companies/:company_id/directors", get(directors::list_directors))
        .route("/api/companies/:company_id/directors", post(directors::create_director))
        .route("/api/companies/:company_id/directors/:director_id", patch(directors::update_director))
        .route("/api/companies/:company_id/directors/:director_id", delete(directors::delete_director))
        .route("/api/companies/:company_id/shareholders", get(shareholders::list_shareholders))
        .route("/api/companies/:company_id/shareholders", post(shareholders::create_shareholder))
        .route("/api/companies/:company_id/shareholders/:shareholder_id", patch(shareholders::update_shareholder))
        .route("/api/companies/:company_id/shareholders/:shareholder_id", delete(shareholders::delete_shareholder))
        .route("/api/companies/:company_id/financials", get(financials::list_financials))
        .route("/api/companies/:company_id/financials", post(financials::create_financial))
        .route("/api/companies/:company_id/financials/:financial_id", patch(financials::update_financial))
        .route("/api/companies/:company_id/financials/:financial_id", delete(financials::delete_financial))
        .route("/api/companies/:company_id/tenders", get(tenders::list_tenders))
        .route("/api/companies/:company_id/tenders", post(tenders::create_tender))
        .route("/api/companies/:company_id/tenders/:tender_id", patch(tenders::update_tender))
        .route("/api/companies/:company_id/tenders/:tender_id", delete(tenders::delete_tender))
        .route("/api/companies/:company_id/encumbrances", get(encumbrances::list_encumbrances))
        .route("/api/companies/:company_id/encumbrances", post(encumbrances::create_encumbrance))
        .route("/api/companies/:company_id/encumbrances/:encumbrance_id", patch(encumbrances::update_encumbrance))
        .route("/api/companies/:company_id/encumbrances/:encumbrance_id", delete(encumbrances::delete_encumbrance))
        .route("/api/companies/:company_id/addresses", get(addresses::list_addresses))
        .route("/api/companies/:company_id/addresses", post(addresses::create_address))
        .route("/api/companies/:company_id/addresses/:address_id", patch(addresses::update_address))
        .route("/api/companies/:company_id/addresses/:address_id", delete(addresses::delete_address))
        .route("/api/companies/:company_id/contacts", get(contacts::list_contacts))
        .route("/api/companies/:company_id/contacts", post(contacts::create_contact))
        .route("/api/companies/:company_id/contacts/:contact_id", patch(contacts::update_contact))
        .route("/api/companies/:company_id/contacts/:contact_id", delete(contacts::delete_contact))
        .route("/api/people/:person_id/companies", get(people::person_companies))
        .route("/api/users", post(users::create_user))
        .route("/api/users/password", post(users::change_password))
        .route("/api/admin/stats", get(admin::stats))
        .with_state(state)
}
