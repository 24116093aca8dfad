#![cfg(feature = "reqwest")]

// self
use idp_broker::{
	_preludet::*,
	error::FailureCode,
	http::ProviderHttpClient,
	identity::{AuthMethodId, CanonicalIdentity, RawProviderProfile, ScopeSet, TokenInfo},
	normalize::normalize,
	provider::{
		AdapterFuture, IdentityProvider, IdpConfig, ProviderCredentials, ProviderDescriptor,
	},
	providers::{GitHubIdp, GoogleIdp},
};

fn config() -> IdpConfig {
	IdpConfig::new("client-it", "secret-it")
		.with_external_url_base(
			Url::parse("https://gw.example.com/auth").expect("Base URL should parse."),
		)
		.with_base_path("/auth")
}

struct PasswordIdp {
	auth_method_id: AuthMethodId,
	descriptor: ProviderDescriptor,
	credentials: ProviderCredentials,
}
impl PasswordIdp {
	fn new() -> Self {
		let auth_method_id =
			AuthMethodId::new("password").expect("Auth method identifier should be valid.");
		let credentials = ProviderCredentials::from_config(&auth_method_id, &config())
			.expect("Password adapter credentials should validate.");
		let descriptor = ProviderDescriptor::builder()
			.authorization_endpoint(
				Url::parse("https://idp.example.com/authorize").expect("URL should parse."),
			)
			.token_endpoint(
				Url::parse("https://idp.example.com/token").expect("URL should parse."),
			)
			.user_info_endpoint(
				Url::parse("https://idp.example.com/userinfo").expect("URL should parse."),
			)
			.build()
			.expect("Password adapter descriptor should validate.");

		Self { auth_method_id, descriptor, credentials }
	}
}
impl IdentityProvider for PasswordIdp {
	fn provider_type(&self) -> &'static str {
		"password"
	}

	fn auth_method_id(&self) -> &AuthMethodId {
		&self.auth_method_id
	}

	fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	fn credentials(&self) -> &ProviderCredentials {
		&self.credentials
	}

	fn authorize_by_user_pass<'a>(
		&'a self,
		username: &'a str,
		password: &'a str,
	) -> AdapterFuture<'a, CanonicalIdentity> {
		Box::pin(async move {
			if password != "hunter2" {
				return Err(Error::ProviderRejected {
					reason: "credentials were not accepted".into(),
				});
			}

			let profile = RawProviderProfile {
				id: "pw-7".into(),
				username: Some(username.to_owned()),
				..Default::default()
			};

			Ok(normalize(&self.auth_method_id, &profile)?)
		})
	}

	fn fetch_profile<'a>(
		&'a self,
		_http: &'a dyn ProviderHttpClient,
		_access_token: &'a str,
	) -> AdapterFuture<'a, RawProviderProfile> {
		Box::pin(async { Ok(RawProviderProfile { id: "pw-7".into(), ..Default::default() }) })
	}
}

fn engine() -> ReqwestTestEngine {
	let google = GoogleIdp::new(
		AuthMethodId::new("google").expect("Auth method identifier should be valid."),
		&config(),
	)
	.expect("Google adapter should construct from valid configuration.");
	let github = GitHubIdp::new(
		AuthMethodId::new("github").expect("Auth method identifier should be valid."),
		&config(),
	)
	.expect("GitHub adapter should construct from valid configuration.");

	build_reqwest_test_engine([Arc::new(google) as Arc<dyn IdentityProvider>, Arc::new(github)])
}

#[tokio::test]
async fn headless_authorization_is_refused_by_redirect_only_providers() {
	let engine = engine();
	let auth_method =
		AuthMethodId::new("google").expect("Auth method identifier should be valid.");
	let err = engine
		.authorize_headless(&auth_method, "ann", "hunter2")
		.await
		.expect_err("Redirect-only providers must refuse headless credentials.");

	assert!(matches!(&err, Error::UnsupportedGrantType { provider } if provider == "google"));

	let failure = err.to_failure();

	assert_eq!(failure.code, FailureCode::UnsupportedGrantType);
	assert_eq!(failure.status, 400);
	assert!(
		!failure.message.contains("hunter2"),
		"Translated failures must never echo credentials.",
	);
	assert_eq!(engine.metrics.failures(), 1);
}

#[tokio::test]
async fn headless_authorization_succeeds_for_password_capable_adapters() {
	let engine = build_reqwest_test_engine([
		Arc::new(PasswordIdp::new()) as Arc<dyn IdentityProvider>
	]);
	let auth_method =
		AuthMethodId::new("password").expect("Auth method identifier should be valid.");
	let identity = engine
		.authorize_headless(&auth_method, "ann", "hunter2")
		.await
		.expect("Password-capable adapters should grant headless authorization.");

	assert_eq!(identity.custom_id.to_string(), "password:pw-7");
	assert_eq!(identity.profile.username, "ann");
	assert_eq!(engine.metrics.successes(), 1);
	assert_eq!(engine.metrics.failures(), 0);

	let err = engine
		.authorize_headless(&auth_method, "ann", "wrong")
		.await
		.expect_err("Rejected credentials must fail the attempt.");

	assert!(matches!(err, Error::ProviderRejected { .. }));
	assert_eq!(engine.metrics.failures(), 1);
}

#[tokio::test]
async fn unknown_auth_methods_fail_with_a_stable_code() {
	let engine = engine();
	let auth_method =
		AuthMethodId::new("missing").expect("Auth method identifier should be valid.");
	let err = engine
		.authorize_headless(&auth_method, "ann", "hunter2")
		.await
		.expect_err("Unregistered auth methods must be refused.");
	let failure = err.to_failure();

	assert_eq!(failure.code, FailureCode::UnknownProvider);
	assert_eq!(failure.status, 404);
}

#[tokio::test]
async fn refresh_checks_default_to_allow_for_both_builtins() {
	let engine = engine();
	let token = TokenInfo {
		custom_id: None,
		expires_at: Some(OffsetDateTime::now_utc() + Duration::hours(1)),
		scope: ScopeSet::new(["profile"]).expect("Scope should be valid."),
	};

	for method in ["google", "github"] {
		let auth_method =
			AuthMethodId::new(method).expect("Auth method identifier should be valid.");
		let decision = engine
			.check_refresh(&auth_method, &token)
			.await
			.expect("Default refresh checks should never fail.");

		assert!(decision.allow, "`{method}` should allow refreshes by default");
		assert!(decision.reason.is_none());
	}
}

#[tokio::test]
async fn failure_redirects_point_at_the_configured_failure_page() {
	let engine = engine();
	let auth_method =
		AuthMethodId::new("google").expect("Auth method identifier should be valid.");
	let adapter = engine
		.registry
		.resolve(&auth_method)
		.expect("Registered adapter should resolve successfully.");

	assert_eq!(adapter.credentials().failure_redirect, "/auth/failure");

	let err = engine
		.authorize_headless(&auth_method, "ann", "hunter2")
		.await
		.expect_err("Redirect-only providers must refuse headless credentials.");
	let failure =
		err.to_failure().with_redirect(adapter.credentials().failure_redirect.clone());

	assert_eq!(failure.redirect.as_deref(), Some("/auth/failure"));
}
