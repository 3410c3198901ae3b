//! Integration tests for the Diesel repositories against embedded PostgreSQL.
//!
//! Each test provisions a temporary database on a `pg-embed-setup-unpriv`
//! cluster and applies the bundled migrations. Steps stay synchronous and
//! drive the adapters through one Tokio runtime per test, so the cluster is
//! never bootstrapped from inside a runtime.
//!
//! Hosts that cannot start the cluster (no network for the PostgreSQL
//! download, no unprivileged worker) print a `SKIP-TEST-CLUSTER` marker and
//! skip.

use chrono::NaiveDate;
use pg_embedded_setup_unpriv::{TemporaryDatabase, TestCluster};
use portfolio::domain::ports::{
    ContactMessageRepository, ProjectPersistenceError, ProjectRepository, UserPersistenceError,
    UserRepository,
};
use portfolio::domain::{
    Category, ContactDraft, DisplayName, EmailAddress, NewProject, NewUser, PasswordHash,
    ProjectDraft, ProjectUpdate, User, UserId, WebUrl,
};
use portfolio::outbound::persistence::{
    DbPool, DieselContactMessageRepository, DieselProjectRepository, DieselUserRepository,
    PoolConfig, run_pending_migrations,
};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Repositories over a freshly migrated database.
///
/// Field order is drop order: the pool goes before the database, the database
/// before the cluster.
struct Harness {
    users: DieselUserRepository,
    projects: DieselProjectRepository,
    contact: DieselContactMessageRepository,
    runtime: Runtime,
    _database: TemporaryDatabase,
    _cluster: TestCluster,
}

impl Harness {
    fn start() -> Result<Self, String> {
        let cluster = TestCluster::new().map_err(|err| format!("{err:?}"))?;
        let name = format!("portfolio_{}", Uuid::new_v4().simple());
        let database = cluster
            .temporary_database(name.as_str())
            .map_err(|err| format!("{err:?}"))?;
        run_pending_migrations(database.url()).map_err(|err| err.to_string())?;

        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let config = PoolConfig::new(database.url())
            .with_max_size(2)
            .with_min_idle(Some(1));
        let pool = runtime
            .block_on(DbPool::new(config))
            .map_err(|err| err.to_string())?;

        Ok(Self {
            users: DieselUserRepository::new(pool.clone()),
            projects: DieselProjectRepository::new(pool.clone()),
            contact: DieselContactMessageRepository::new(pool),
            runtime,
            _database: database,
            _cluster: cluster,
        })
    }

    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn account(&self, email: &str) -> User {
        self.block_on(self.users.create(&new_user(email)))
            .expect("account stored")
    }
}

#[fixture]
fn harness() -> Option<Harness> {
    match Harness::start() {
        Ok(harness) => Some(harness),
        Err(reason) => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
    }
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: EmailAddress::new(email).expect("email"),
        name: DisplayName::new("Ada").expect("name"),
        password_hash: PasswordHash::new("$argon2id$v=19$stub").expect("hash"),
    }
}

fn draft(title: &str) -> ProjectDraft {
    ProjectDraft {
        title: title.to_owned(),
        project_url: WebUrl::new("https://x.io").expect("url"),
        category: Category::Python,
        img_url: WebUrl::new("https://x.io/i.png").expect("url"),
        body: "<p>hello</p>".to_owned(),
    }
}

fn new_project(title: &str, author: UserId) -> NewProject {
    NewProject {
        draft: draft(title),
        author,
        created_on: NaiveDate::from_ymd_opt(2024, 3, 5).expect("date"),
    }
}

#[rstest]
fn accounts_round_trip_and_reject_duplicate_emails(harness: Option<Harness>) {
    let Some(harness) = harness else { return };

    let stored = harness.account("ada@example.com");
    assert_eq!(stored.id(), UserId::ADMIN);

    let email = EmailAddress::new("ada@example.com").expect("email");
    let found = harness
        .block_on(harness.users.find_by_email(&email))
        .expect("lookup");
    assert_eq!(found.as_ref(), Some(&stored));
    let by_id = harness
        .block_on(harness.users.find_by_id(stored.id()))
        .expect("lookup");
    assert_eq!(by_id, Some(stored));

    let duplicate = harness.block_on(harness.users.create(&new_user("ada@example.com")));
    assert!(matches!(
        duplicate,
        Err(UserPersistenceError::DuplicateEmail { .. })
    ));
}

#[rstest]
fn projects_round_trip_through_edit_and_delete(harness: Option<Harness>) {
    let Some(harness) = harness else { return };
    let owner = harness.account("owner@example.com");
    let editor = harness.account("editor@example.com");

    let created = harness
        .block_on(harness.projects.create(&new_project("Demo", owner.id())))
        .expect("project stored");
    assert_eq!(created.draft, draft("Demo"));
    assert_eq!(created.author.id, owner.id());
    let fetched = harness
        .block_on(harness.projects.find_by_id(created.id))
        .expect("lookup");
    assert_eq!(fetched.as_ref(), Some(&created));

    let python = harness
        .block_on(harness.projects.list(Some(Category::Python)))
        .expect("list");
    assert_eq!(python.len(), 1);
    let wordpress = harness
        .block_on(harness.projects.list(Some(Category::Wordpress)))
        .expect("list");
    assert!(wordpress.is_empty());

    let updated = harness
        .block_on(harness.projects.update(&ProjectUpdate {
            id: created.id,
            draft: draft("Renamed"),
            author: editor.id(),
        }))
        .expect("project updated");
    assert_eq!(updated.draft.title, "Renamed");
    assert_eq!(updated.created_on, created.created_on);
    assert_eq!(updated.author.id, editor.id());

    harness
        .block_on(harness.projects.delete(created.id))
        .expect("project deleted");
    let gone = harness
        .block_on(harness.projects.find_by_id(created.id))
        .expect("lookup");
    assert!(gone.is_none());
    let again = harness.block_on(harness.projects.delete(created.id));
    assert!(matches!(again, Err(ProjectPersistenceError::NotFound { .. })));
}

#[rstest]
fn project_constraints_map_to_conflicts(harness: Option<Harness>) {
    let Some(harness) = harness else { return };
    let owner = harness.account("owner@example.com");
    harness
        .block_on(harness.projects.create(&new_project("Demo", owner.id())))
        .expect("project stored");

    let duplicate = harness.block_on(harness.projects.create(&new_project("Demo", owner.id())));
    assert!(matches!(
        duplicate,
        Err(ProjectPersistenceError::DuplicateTitle { .. })
    ));

    let stranger = UserId::new(42).expect("user id");
    let orphan = harness.block_on(harness.projects.create(&new_project("Orphan", stranger)));
    assert!(matches!(
        orphan,
        Err(ProjectPersistenceError::AuthorMissing { .. })
    ));
}

#[rstest]
fn contact_messages_get_increasing_identities(harness: Option<Harness>) {
    let Some(harness) = harness else { return };
    let message = ContactDraft {
        name: "Grace".to_owned(),
        email: "grace@example.com".to_owned(),
        subject: String::new(),
        message: "Hi".to_owned(),
    };

    let first = harness
        .block_on(harness.contact.create(&message))
        .expect("message stored");
    let second = harness
        .block_on(harness.contact.create(&message))
        .expect("message stored");
    assert!(second.get() > first.get());
}
