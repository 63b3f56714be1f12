//! Sign-in flows for the lesson portal.
//!
//! Credentials come from the `--user` flag and the environment. The password is
//! only ever read from `SNIPE_PASSWORD`, never accepted on the command line.

use std::time::Duration;

use async_trait::async_trait;
use snipe::{PageInspector, SiteProfile};
use tracing::info;

use crate::browser::LessonSession;
use crate::cli::IdentityFlow;
use crate::error::{CliError, Result};

const USER_ENV: &str = "SNIPE_USER";
const PASSWORD_ENV: &str = "SNIPE_PASSWORD";

/// How long a login form gets to render before the flow gives up.
const FORM_TIMEOUT: Duration = Duration::from_secs(10);
/// How long the lesson page gets to come back after authentication.
const PAGE_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug)]
pub struct Credentials {
	pub user: String,
	pub password: String,
}

/// Resolve credentials from the `--user` flag and the environment.
pub fn resolve(user_flag: Option<&str>) -> Result<Credentials> {
	resolve_from(user_flag, std::env::var(USER_ENV).ok(), std::env::var(PASSWORD_ENV).ok())
}

fn resolve_from(user_flag: Option<&str>, env_user: Option<String>, env_password: Option<String>) -> Result<Credentials> {
	let user = user_flag
		.map(str::to_string)
		.or(env_user)
		.ok_or_else(|| CliError::Credentials(format!("no user given; pass --user or set {USER_ENV}")))?;
	let password = env_password.ok_or_else(|| {
		CliError::Credentials(format!("{PASSWORD_ENV} is not set; the password is only ever read from the environment"))
	})?;
	Ok(Credentials { user, password })
}

/// What a sign-in flow does to a page, factored out so the flow order
/// can be exercised without a browser.
#[async_trait]
trait LoginSurface: Send + Sync {
	async fn wait_for(&self, selector: &str, timeout: Duration) -> snipe::Result<()>;
	async fn type_into(&self, selector: &str, text: &str) -> snipe::Result<()>;
	async fn click(&self, selector: &str) -> snipe::Result<()>;
	async fn click_and_wait(&self, selector: &str) -> snipe::Result<()>;
}

#[async_trait]
impl LoginSurface for LessonSession {
	async fn wait_for(&self, selector: &str, timeout: Duration) -> snipe::Result<()> {
		LessonSession::wait_for(self, selector, timeout).await
	}

	async fn type_into(&self, selector: &str, text: &str) -> snipe::Result<()> {
		LessonSession::type_into(self, selector, text).await
	}

	async fn click(&self, selector: &str) -> snipe::Result<()> {
		PageInspector::click(self, selector).await
	}

	async fn click_and_wait(&self, selector: &str) -> snipe::Result<()> {
		LessonSession::click_and_wait(self, selector).await
	}
}

/// Walk the portal's sign-in flow until the enrollment widget is back on screen.
///
/// The lesson page must already be loaded in `session`. Which form fields get
/// filled depends on `flow`: the portal's own account form, or the federated
/// institution login behind the identity-provider picker.
pub async fn login(session: &LessonSession, flow: IdentityFlow, credentials: &Credentials, profile: &SiteProfile) -> snipe::Result<()> {
	sign_in(session, flow, credentials, profile).await
}

/// Every control is awaited before it is driven; the federated pages
/// render their buttons and the institution list asynchronously.
async fn sign_in<S: LoginSurface>(surface: &S, flow: IdentityFlow, credentials: &Credentials, profile: &SiteProfile) -> snipe::Result<()> {
	info!(target = "snipe", flow = %flow, "signing in");

	surface.wait_for(&profile.locators.login_entry, FORM_TIMEOUT).await?;
	surface.click_and_wait(&profile.locators.login_entry).await?;

	match flow {
		IdentityFlow::Direct => {
			surface.wait_for(&profile.locators.direct_user_field, FORM_TIMEOUT).await?;
			surface.type_into(&profile.locators.direct_user_field, &credentials.user).await?;
			surface.type_into(&profile.locators.direct_password_field, &credentials.password).await?;
			surface.click_and_wait(&profile.locators.direct_submit).await?;
		}
		IdentityFlow::SwitchAai => {
			surface.wait_for(&profile.locators.aai_provider, FORM_TIMEOUT).await?;
			surface.click_and_wait(&profile.locators.aai_provider).await?;
			surface.wait_for(&profile.locators.aai_picker, FORM_TIMEOUT).await?;
			// Opens the institution dropdown in place; no navigation to wait on.
			surface.click(&profile.locators.aai_picker).await?;
			surface.wait_for(&profile.locators.aai_institution, FORM_TIMEOUT).await?;
			surface.click_and_wait(&profile.locators.aai_institution).await?;
			surface.wait_for(&profile.locators.aai_user_field, FORM_TIMEOUT).await?;
			surface.type_into(&profile.locators.aai_user_field, &credentials.user).await?;
			surface.type_into(&profile.locators.aai_password_field, &credentials.password).await?;
			surface.click_and_wait(&profile.locators.aai_submit).await?;
		}
	}

	surface.wait_for(&profile.locators.enrollment_widget, PAGE_TIMEOUT).await?;
	info!(target = "snipe", "signed in, back on the lesson page");
	Ok(())
}
