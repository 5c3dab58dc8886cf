//! Lists schools through the reqwest-backed client against a mock backend whose first answer is
//! an expired-session 401, showing the transparent refresh and single retry.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use mbg_api_client::{
	auth::{CredentialPair, UserRole},
	config::ClientConfig,
	http::ReqwestTransport,
	resources::{ApiClient, PageRequest},
	session::SessionEvent,
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/schools").header("authorization", "Bearer stale-access");
			then.status(401).header("content-type", "application/json").body(
				json!({
					"success": false,
					"error": { "code": "UNAUTHORIZED", "message": "token expired" },
				})
				.to_string(),
			);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/refresh");
			then.status(200).header("content-type", "application/json").body(
				json!({
					"success": true,
					"data": { "access_token": "fresh-access", "refresh_token": "fresh-refresh" },
				})
				.to_string(),
			);
		})
		.await;
	let schools = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/schools").header("authorization", "Bearer fresh-access");
			then.status(200).header("content-type", "application/json").body(
				json!({
					"success": true,
					"data": [{
						"id": "sch-1",
						"name": "SDN Menteng 01",
						"address": "Jl. Merdeka 1",
						"phone": "+62-21-555-0100",
						"email": "office@school.test",
						"principal": "Ibu Ratna",
						"students_count": 320,
						"created_at": "2024-07-01T08:00:00Z",
						"updated_at": "2024-07-01T08:00:00Z",
					}],
					"meta": { "total": 1 },
				})
				.to_string(),
			);
		})
		.await;
	let config = ClientConfig::builder()
		.base_url(server.base_url())
		.user_role(UserRole::Admin)
		.build()?;
	let store: Arc<dyn CredentialStore> =
		Arc::new(MemoryStore::with_pair(CredentialPair::new("stale-access", "stale-refresh")));
	let client = ApiClient::with_parts(
		config,
		store,
		Arc::new(ReqwestTransport::default()),
		Arc::new(|event: &SessionEvent| println!("Session event: {event:?}.")),
	);
	let page = client.list_schools(PageRequest::first(25)).await?;

	for school in &page.items {
		println!(
			"{} ({} students), principal {}.",
			school.name, school.students_count, school.principal
		);
	}

	println!("Total reported by the backend: {:?}.", page.meta.total);

	expired.assert_async().await;
	refresh.assert_async().await;
	schools.assert_async().await;

	Ok(())
}
