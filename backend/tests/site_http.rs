//! In-process HTTP tests driving the full route table over the in-memory
//! store.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use portfolio::Trace;
use portfolio::domain::TRACE_ID_HEADER;
use portfolio::inbound::http::configure;
use portfolio::inbound::http::state::{HttpState, HttpStatePorts, ResumeFile};
use portfolio::outbound::memory::InMemoryStore;
use portfolio::outbound::password::Argon2PasswordHasher;
use rstest::rstest;

fn state(store: &Arc<InMemoryStore>) -> HttpState {
    HttpState::new(
        HttpStatePorts {
            users: store.clone(),
            projects: store.clone(),
            contact_messages: store.clone(),
            hasher: Arc::new(Argon2PasswordHasher::default()),
            clock: Arc::new(DefaultClock),
        },
        ResumeFile::new(std::env::temp_dir().join("portfolio-no-cv.pdf"), "CV.pdf"),
    )
}

macro_rules! site {
    () => {
        site!(&Arc::new(InMemoryStore::default()))
    };
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state($store)))
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("session".to_owned())
                        .cookie_secure(false)
                        .build(),
                )
                .wrap(Trace)
                .configure(configure),
        )
        .await
    };
}

/// A browser-like visitor carrying its session cookie between requests.
#[derive(Default)]
struct Visitor {
    cookie: Option<Cookie<'static>>,
}

impl Visitor {
    async fn send<S, B>(&mut self, app: &S, req: test::TestRequest) -> ServiceResponse<B>
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    {
        let req = match &self.cookie {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        };
        let res = test::call_service(app, req.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
        {
            self.cookie = Some(cookie.into_owned());
        }
        res
    }

    async fn get<S, B>(&mut self, app: &S, uri: &str) -> ServiceResponse<B>
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    {
        self.send(app, test::TestRequest::get().uri(uri)).await
    }

    async fn post<S, B>(&mut self, app: &S, uri: &str, form: &[(&str, &str)]) -> ServiceResponse<B>
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    {
        self.send(app, test::TestRequest::post().uri(uri).set_form(form))
            .await
    }

    async fn register<S, B>(&mut self, app: &S, email: &str, password: &str) -> ServiceResponse<B>
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    {
        self.post(
            app,
            "/register",
            &[("email", email), ("password", password), ("name", "Someone")],
        )
        .await
    }
}

fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

async fn text<B: MessageBody>(res: ServiceResponse<B>) -> String {
    let body = test::read_body(res).await;
    String::from_utf8(body.to_vec()).expect("utf8 body")
}

const DEMO: [(&str, &str); 5] = [
    ("title", "Demo"),
    ("project_url", "https://x.io"),
    ("category", "Python"),
    ("img_url", "https://x.io/i.png"),
    ("body", "<p>hello</p>"),
];

#[actix_web::test]
async fn administrator_publishes_edits_and_deletes_a_project() {
    let app = site!();
    let mut admin = Visitor::default();

    let res = admin.register(&app, "owner@example.com", "owner-pass").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/"));

    let res = admin.get(&app, "/new-project").await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = admin.post(&app, "/new-project", &DEMO).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/projects"));

    let listing = text(admin.get(&app, "/projects?category=Python").await).await;
    assert!(listing.contains("href=\"/project/1\""));
    assert!(listing.contains("Project published."));
    let empty = text(admin.get(&app, "/projects?category=Wordpress").await).await;
    assert!(empty.contains("No projects yet."));

    let edit = text(admin.get(&app, "/edit-project/1").await).await;
    assert!(edit.contains("value=\"Demo\""));
    let mut renamed = DEMO;
    renamed[0] = ("title", "Renamed");
    let res = admin.post(&app, "/edit-project/1", &renamed).await;
    assert_eq!(location(&res), Some("/project/1"));
    let detail = text(admin.get(&app, "/project/1").await).await;
    assert!(detail.contains("Renamed"));
    assert!(detail.contains("<p>hello</p>"));

    let res = admin.post(&app, "/delete/1", &[]).await;
    assert_eq!(location(&res), Some("/projects"));
    let res = admin.get(&app, "/project/1").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn invalid_and_duplicate_projects_rerender_the_form() {
    let app = site!();
    let mut admin = Visitor::default();
    admin.register(&app, "owner@example.com", "owner-pass").await;
    admin.post(&app, "/new-project", &DEMO).await;

    let res = admin.post(&app, "/new-project", &DEMO).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(text(res).await.contains("A project with this title already exists."));

    let res = admin
        .post(&app, "/new-project", &[("title", "Other"), ("project_url", "nope")])
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = text(res).await;
    assert!(body.contains("Invalid URL."));
    assert!(body.contains("This field is required."));
    assert!(body.contains("value=\"Other\""));
}

#[rstest]
#[case("GET", "/new-project")]
#[case("GET", "/edit-project/1")]
#[case("POST", "/delete/1")]
#[actix_web::test]
async fn only_the_first_account_reaches_admin_routes(#[case] method: &str, #[case] uri: &str) {
    let app = site!();
    let mut owner = Visitor::default();
    owner.register(&app, "owner@example.com", "owner-pass").await;
    owner.post(&app, "/new-project", &DEMO).await;

    let mut guest = Visitor::default();
    guest.register(&app, "guest@example.com", "guest-pass").await;
    let mut anonymous = Visitor::default();

    for visitor in [&mut guest, &mut anonymous] {
        let req = match method {
            "POST" => test::TestRequest::post(),
            _ => test::TestRequest::get(),
        };
        let res = visitor.send(&app, req.uri(uri)).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }
}

#[actix_web::test]
async fn login_failures_flash_and_redirect() {
    let app = site!();
    let mut visitor = Visitor::default();
    visitor.register(&app, "ada@example.com", "right-pass").await;
    visitor.get(&app, "/logout").await;

    let res = visitor
        .post(&app, "/login", &[("email", "ada@example.com"), ("password", "wrong")])
        .await;
    assert_eq!(location(&res), Some("/login"));
    let page = text(visitor.get(&app, "/login").await).await;
    assert!(page.contains("Password incorrect, please try again."));
    assert!(page.contains("href=\"/register\""));
    let home = text(visitor.get(&app, "/").await).await;
    assert!(home.contains("href=\"/login\""));
    assert!(!home.contains("href=\"/logout\""));

    let res = visitor
        .post(&app, "/login", &[("email", "bob@example.com"), ("password", "x")])
        .await;
    assert_eq!(location(&res), Some("/login"));
    let page = text(visitor.get(&app, "/login").await).await;
    assert!(page.contains("That email does not exist, please try again."));

    let res = visitor
        .post(&app, "/login", &[("email", "ada@example.com"), ("password", "right-pass")])
        .await;
    assert_eq!(location(&res), Some("/"));
    let home = text(visitor.get(&app, "/").await).await;
    assert!(home.contains("href=\"/logout\""));
}

#[actix_web::test]
async fn duplicate_registration_points_to_login() {
    let app = site!();
    let mut first = Visitor::default();
    first.register(&app, "ada@example.com", "first-pass").await;

    let mut second = Visitor::default();
    let res = second.register(&app, "ada@example.com", "other-pass").await;
    assert_eq!(location(&res), Some("/login"));
    let page = text(second.get(&app, "/login").await).await;
    assert!(page.contains("You&#x27;ve already signed up with that email, log in instead!"));
}

#[actix_web::test]
async fn contact_form_reports_errors_and_confirms() {
    let store = Arc::new(InMemoryStore::default());
    let app = site!(&store);
    let mut visitor = Visitor::default();

    let res = visitor
        .post(&app, "/contact", &[("email", "grace@example.com")])
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = text(res).await;
    assert!(body.contains("Error in Full Name: This field is required."));
    assert!(body.contains("value=\"grace@example.com\""));
    assert!(store.contact_messages().is_empty());

    let res = visitor
        .post(
            &app,
            "/contact",
            &[("name", "Grace"), ("email", "grace@example.com"), ("message", "Hi")],
        )
        .await;
    assert!(text(res).await.contains("Your message has been submitted."));
    let stored = store.contact_messages();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.first().map(|draft| draft.name.as_str()), Some("Grace"));
}

#[actix_web::test]
async fn missing_pages_carry_a_trace_id() {
    let app = site!();
    let mut visitor = Visitor::default();
    let res = visitor.get(&app, "/project/999").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let trace_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .expect("trace id header")
        .to_owned();
    assert!(text(res).await.contains(&trace_id));
}
