//! Example: paging through the users API.
//!
//! Demonstrates: envelope vs convenience error policy, pagination.
//!
//! Run with:
//! `VITRINA_API_BASE_URL=https://reqres.in/api VITRINA_API_KEY=... \
//!  cargo run --example api_pagination`

use vitrina::prelude::*;

#[tokio::main]
async fn main() -> VitrinaResult<()> {
    let config = HarnessConfig::from_env()?;
    let client = RestClient::new(&config.api_base_url, &config.api_key);

    // The primitive never raises on HTTP status.
    let envelope = client.request(Method::Get, "/users?page=1", None).await?;
    println!("GET /users -> {} {}", envelope.status, envelope.status_text);

    // The convenience layer decodes and fails loudly instead.
    let page = client.get_users(Some(2), Some(3)).await?;
    println!(
        "page {}/{} ({} of {} users)",
        page.page,
        page.total_pages,
        page.data.len(),
        page.total
    );
    for user in &page.data {
        println!("  #{} {} {} <{}>", user.id, user.first_name, user.last_name, user.email);
    }

    // A page past the end is a well-formed, empty collection.
    let empty = client.get_users(Some(999), None).await?;
    println!(
        "page 999: {} records, totals unchanged ({} / {})",
        empty.data.len(),
        empty.total,
        empty.total_pages
    );

    let created = client
        .create_user(&CreateUserRequest {
            name: "Moxy Mind".to_string(),
            job: "QA Engineer".to_string(),
        })
        .await?;
    println!("created user id={} at {}", created.id, created.created_at);

    Ok(())
}
