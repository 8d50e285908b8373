//! OAuth authorization flow.
//!
//! `/auth/login` sends the broadcaster to the platform, which redirects back
//! to `/auth/callback` with a code. A successful callback stores the
//! broadcaster's tokens and starts monitoring their channel.

use axum::{
    Router,
    extract::{Query, State},
    response::{Html, Redirect},
    routing::get,
};
use helix_client::User;
use helix_client::oauth::DEFAULT_SCOPES;
use tracing::{error, info, warn};
use url::Url;

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::CallbackQuery;
use crate::api::server::AppState;
use crate::credentials::ChannelCredential;
use crate::error::Result;

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <body>
    <h1>Authorization Successful!</h1>
    <p>Your channel is now being monitored. You can close this window and return to the extension.</p>
  </body>
</html>
"#;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/success", get(success))
}

async fn login(State(state): State<AppState>) -> ApiResult<Redirect> {
    let url = state
        .oauth
        .authorize_url(&state.redirect_uri(), DEFAULT_SCOPES)
        .map_err(|e| {
            error!(error = %e, "Failed to build authorize URL");
            ApiError::internal("Authorization is misconfigured")
        })?;
    Ok(Redirect::to(url.as_str()))
}

async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Html<String>> {
    if let Some(reason) = query.error {
        warn!(
            error = %reason,
            description = query.error_description.as_deref().unwrap_or(""),
            "Authorization denied"
        );
        return Err(ApiError::bad_request("Authorization was denied"));
    }

    let Some(code) = query.code.filter(|code| !code.is_empty()) else {
        return Err(ApiError::bad_request("Authorization code missing"));
    };

    let user = authorize(&state, &code).await.map_err(|e| {
        error!(error = %e, "OAuth callback failed");
        ApiError::internal("Authorization failed")
    })?;

    let success_url = success_url(&state.backend_url, &user.id).map_err(|e| {
        error!(error = %e, "Failed to build success URL");
        ApiError::internal("Authorization failed")
    })?;

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html>
  <body>
    <h1>Authorization Successful!</h1>
    <p>You can now close this window and return to the extension.</p>
    <script>
      window.location = "{success_url}";
    </script>
  </body>
</html>
"#
    )))
}

/// Exchange the code, identify the broadcaster and start their monitor.
async fn authorize(state: &AppState, code: &str) -> Result<User> {
    let tokens = state
        .oauth
        .exchange_code(code, &state.redirect_uri())
        .await?;
    let user = state.helix.get_current_user(&tokens.access_token).await?;

    let added = state.credential_store().upsert(ChannelCredential {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user_id: user.id.clone(),
        login: user.login.clone(),
        display_name: user.display_name.clone(),
    });
    let started = state.scheduler.start(&user.id);

    info!(
        channel_id = %user.id,
        login = %user.login,
        new_credential = added,
        monitor_started = started,
        "Channel authorized"
    );
    Ok(user)
}

/// `{backend}/auth/success?userId=...` with the id percent-encoded.
fn success_url(backend_url: &str, user_id: &str) -> std::result::Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{backend_url}/auth/success"))?;
    url.query_pairs_mut().append_pair("userId", user_id);
    Ok(url)
}

async fn success() -> Html<&'static str> {
    Html(SUCCESS_PAGE)
}
