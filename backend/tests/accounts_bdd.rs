//! Behaviour tests for registration, login and the administrator guard.
//!
//! Scenarios run the authentication service over the in-memory store with
//! real Argon2 hashing.

use std::sync::Arc;

use portfolio::domain::forms::{LoginInput, RegistrationInput};
use portfolio::domain::{Actor, AuthError, AuthService, CredentialFailure, Error, ErrorCode, User};
use portfolio::outbound::memory::InMemoryStore;
use portfolio::outbound::password::Argon2PasswordHasher;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tokio::runtime::Runtime;

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Default, ScenarioState)]
struct AccountsWorld {
    runtime: Slot<RuntimeHandle>,
    auth: Slot<AuthService>,
    registration: Slot<Result<User, AuthError>>,
    login: Slot<Result<User, AuthError>>,
    actor: Slot<Actor>,
    guard: Slot<Result<User, Error>>,
}

impl AccountsWorld {
    fn ensure_store(&self) {
        if self.auth.get().is_some() {
            return;
        }
        let store = Arc::new(InMemoryStore::default());
        self.auth.set(AuthService::new(
            store,
            Arc::new(Argon2PasswordHasher::default()),
        ));
        self.runtime
            .set(RuntimeHandle(Arc::new(Runtime::new().expect("create runtime"))));
    }

    fn services(&self) -> (Arc<Runtime>, AuthService) {
        self.ensure_store();
        let runtime = self.runtime.get().expect("runtime");
        let auth = self.auth.get().expect("auth service");
        (runtime.0, auth)
    }

    fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let registration = RegistrationInput {
            email: email.to_owned(),
            password: password.to_owned(),
            name: "Someone".to_owned(),
        }
        .validate()
        .expect("valid registration form");
        let (runtime, auth) = self.services();
        runtime.block_on(async { auth.register(&registration).await })
    }

    fn login_result(&self) -> Result<User, AuthError> {
        self.login.get().expect("login attempted")
    }
}

#[fixture]
fn world() -> AccountsWorld {
    AccountsWorld::default()
}

#[given("an empty account store")]
fn an_empty_account_store(world: &AccountsWorld) {
    world.ensure_store();
}

#[given("an account registered as {email} with password {password}")]
fn an_account_registered_as(world: &AccountsWorld, email: String, password: String) {
    world
        .register(&email, &password)
        .expect("account registration succeeds");
}

#[when("{email} registers with password {password}")]
fn registers_with_password(world: &AccountsWorld, email: String, password: String) {
    let result = world.register(&email, &password);
    world.registration.set(result);
}

#[when("{email} logs in with password {password}")]
fn logs_in_with_password(world: &AccountsWorld, email: String, password: String) {
    let credentials = LoginInput { email, password }
        .validate()
        .expect("valid login form");
    let (runtime, auth) = world.services();
    let (result, actor) = runtime.block_on(async {
        let result = auth.login(&credentials).await;
        let signed_in = result.as_ref().ok().map(User::id);
        let actor = auth
            .current_actor(signed_in)
            .await
            .expect("actor resolves");
        (result, actor)
    });
    world.login.set(result);
    world.actor.set(actor);
}

#[when("the admin guard checks the visitor")]
fn the_admin_guard_checks_the_visitor(world: &AccountsWorld) {
    let actor = world.actor.get().unwrap_or_default();
    world
        .guard
        .set(AuthService::require_admin(&actor).cloned());
}

#[then("the registration succeeds")]
fn the_registration_succeeds(world: &AccountsWorld) {
    let result = world.registration.get().expect("registration attempted");
    assert!(result.is_ok(), "expected registration to succeed: {result:?}");
}

#[then("the registration is rejected as a duplicate email")]
fn the_registration_is_rejected_as_a_duplicate_email(world: &AccountsWorld) {
    let result = world.registration.get().expect("registration attempted");
    assert!(matches!(result, Err(AuthError::DuplicateEmail)), "{result:?}");
}

#[then("the login succeeds")]
fn the_login_succeeds(world: &AccountsWorld) {
    let user = world.login_result().expect("login succeeds");
    assert_eq!(world.actor.get().and_then(|actor| actor.user().cloned()), Some(user));
}

#[then("the login fails because the password is wrong")]
fn the_login_fails_because_the_password_is_wrong(world: &AccountsWorld) {
    assert!(matches!(
        world.login_result(),
        Err(AuthError::InvalidCredentials {
            reason: CredentialFailure::WrongPassword
        })
    ));
}

#[then("the login fails because the email is unknown")]
fn the_login_fails_because_the_email_is_unknown(world: &AccountsWorld) {
    assert!(matches!(
        world.login_result(),
        Err(AuthError::InvalidCredentials {
            reason: CredentialFailure::UnknownEmail
        })
    ));
}

#[then("the visitor is anonymous")]
fn the_visitor_is_anonymous(world: &AccountsWorld) {
    assert_eq!(world.actor.get(), Some(Actor::Anonymous));
}

#[then("administrator access is granted")]
fn administrator_access_is_granted(world: &AccountsWorld) {
    let admin = world.guard.get().expect("guard ran").expect("access granted");
    assert!(admin.is_admin());
}

#[then("administrator access is forbidden")]
fn administrator_access_is_forbidden(world: &AccountsWorld) {
    let error = world.guard.get().expect("guard ran").expect_err("access refused");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[scenario(
    path = "tests/features/accounts.feature",
    name = "A fresh account can sign in"
)]
fn a_fresh_account_can_sign_in(world: AccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/accounts.feature",
    name = "Registering the same email twice is rejected"
)]
fn registering_the_same_email_twice_is_rejected(world: AccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/accounts.feature",
    name = "A wrong password keeps the visitor anonymous"
)]
fn a_wrong_password_keeps_the_visitor_anonymous(world: AccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/accounts.feature",
    name = "Unknown emails are reported"
)]
fn unknown_emails_are_reported(world: AccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/admin.feature",
    name = "The first account is the administrator"
)]
fn the_first_account_is_the_administrator(world: AccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/admin.feature",
    name = "Later accounts are not administrators"
)]
fn later_accounts_are_not_administrators(world: AccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/admin.feature",
    name = "Anonymous visitors are not administrators"
)]
fn anonymous_visitors_are_not_administrators(world: AccountsWorld) {
    let _ = world;
}
