use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use userlist_api::users::{DEFAULT_PAGE, DEFAULT_RESULTS};
use userlist_api::{ApiClient, ApiResponse, UserQuery};
use userlist_output::OutputRenderer;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page number to fetch
    #[arg(long, default_value_t = DEFAULT_PAGE, allow_negative_numbers = true)]
    pub page: i64,
    /// Number of users per page
    #[arg(long, default_value_t = DEFAULT_RESULTS, allow_negative_numbers = true)]
    pub results: i64,
    /// Print the response body untouched instead of a user table
    #[arg(long)]
    pub raw: bool,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct UserRow<'a> {
    name: String,
    email: &'a str,
    gender: Option<&'a str>,
    nat: Option<&'a str>,
    phone: Option<&'a str>,
}

pub async fn execute(args: ListArgs, client: &ApiClient, renderer: &OutputRenderer) -> Result<()> {
    let query = UserQuery::new(args.page, args.results);

    if args.raw {
        let body: Value = client
            .get_json(query)
            .await
            .with_context(|| format!("Failed to fetch page {}", query.page))?;
        return renderer.render(&body);
    }

    let response = client
        .get_users(query)
        .await
        .with_context(|| format!("Failed to fetch page {}", query.page))?;

    eprintln!("page {}, {} users", query.page, response.results.len());
    renderer.render(&user_rows(&response))
}

pub fn user_rows(response: &ApiResponse) -> Vec<UserRow<'_>> {
    response
        .results
        .iter()
        .map(|user| UserRow {
            name: user.full_name(),
            email: user.email.as_str(),
            gender: user.gender.as_deref(),
            nat: user.nat.as_deref(),
            phone: user.phone.as_deref(),
        })
        .collect()
}
