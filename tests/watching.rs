use github_activity::{
    client::{Error, PaginationOptions},
    Client, Params,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "deadbeef";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

async fn setup() -> (MockServer, Client) {
    init_logging();

    let server = MockServer::start().await;
    let client = Client::builder()
        .base_url(server.uri())
        .github_api_token(TOKEN)
        .build()
        .unwrap();

    (server, client)
}

fn watcher(login: &str) -> Value {
    json!({
        "login": login,
        "id": 1,
        "url": format!("https://api.github.com/users/{}", login),
        "type": "User",
        "site_admin": false
    })
}

#[tokio::test]
async fn list_watchers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/repos/alice/repo1/subscribers"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .and(header("authorization", "token deadbeef"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([watcher("octocat"), watcher("hubot")]))
                .insert_header(
                    "Link",
                    r#"<https://api.github.com/repos/alice/repo1/subscribers?page=2&per_page=2>; rel="next", <https://api.github.com/repos/alice/repo1/subscribers?page=4&per_page=2>; rel="last""#,
                )
                .insert_header("X-RateLimit-Limit", "5000")
                .insert_header("X-RateLimit-Remaining", "4999"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .activity()
        .watching()
        .list("alice", "repo1", PaginationOptions::page(1).per_page(2).into())
        .await
        .unwrap();

    assert!(response.pagination().has_next());
    assert_eq!(response.pagination().next_page, Some(2));
    assert_eq!(response.pagination().last_page, Some(4));
    assert_eq!(response.rate().limit, 5000);
    assert_eq!(response.rate().remaining, 4999);

    let logins: Vec<_> = response
        .data()
        .iter()
        .map(|w| w["login"].as_str().unwrap())
        .collect();
    assert_eq!(logins, ["octocat", "hubot"]);
}

#[tokio::test]
async fn list_each_watcher() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/repos/alice/repo1/subscribers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([watcher("a"), watcher("b"), watcher("c")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut logins = Vec::new();
    client
        .activity()
        .watching()
        .list_each("alice", "repo1", Params::new(), |w| {
            logins.push(w["login"].as_str().unwrap().to_owned())
        })
        .await
        .unwrap();

    assert_eq!(logins, ["a", "b", "c"]);
}

#[tokio::test]
async fn list_uses_default_context() {
    init_logging();
    let server = MockServer::start().await;
    let client = Client::builder()
        .base_url(server.uri())
        .owner("octocat")
        .repo("hello-world")
        .build()
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello-world/subscribers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let watchers = client
        .activity()
        .watching()
        .list("", "", Params::new())
        .await
        .unwrap();
    assert!(watchers.data().is_empty());
}

#[tokio::test]
async fn watched_by_authenticated_user() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/subscriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "full_name": "alice/repo1" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let repos = client
        .activity()
        .watching()
        .watched(Params::new())
        .await
        .unwrap();
    assert_eq!(repos.data()[0]["full_name"], "alice/repo1");
}

#[tokio::test]
async fn watched_by_user() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/bob/subscriptions"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client
        .activity()
        .watching()
        .watched(Params::new().with("user", "bob").with("page", 3))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query_pairs().all(|(k, _)| k != "user"));
}

#[tokio::test]
async fn is_watching() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/subscriptions/alice/repo1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/subscriptions/alice/repo2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://developer.github.com/v3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let watching = client.activity().watching();
    assert!(watching.is_watching("alice", "repo1", Params::new()).await.unwrap());
    assert!(!watching.is_watching("alice", "repo2", Params::new()).await.unwrap());
}

#[tokio::test]
async fn is_watching_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/subscriptions/alice/repo1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "Server Error" })))
        .expect(1)
        .mount(&server)
        .await;

    match client
        .activity()
        .watching()
        .is_watching("alice", "repo1", Params::new())
        .await
    {
        Err(Error::GithubClientError(status, error)) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(error.message(), Some("Server Error"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn is_watching_rate_limited() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/subscriptions/alice/repo1"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("X-RateLimit-Remaining", "0")
                .set_body_json(json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&server)
        .await;

    assert!(matches!(
        client
            .activity()
            .watching()
            .is_watching("alice", "repo1", Params::new())
            .await,
        Err(Error::RateLimit)
    ));
}

#[tokio::test]
async fn watch() {
    let (server, client) = setup().await;

    let subscription = json!({
        "subscribed": true,
        "ignored": false,
        "reason": null,
        "created_at": "2012-10-06T21:34:12Z",
        "url": "https://api.github.com/repos/alice/repo1/subscription",
        "repository_url": "https://api.github.com/repos/alice/repo1"
    });

    Mock::given(method("PUT"))
        .and(path("/user/subscriptions/alice/repo1"))
        .and(body_json(json!({ "subscribed": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(subscription.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .activity()
        .watching()
        .watch("alice", "repo1", Params::new().with(":subscribed", true))
        .await
        .unwrap();

    assert_eq!(response.into_inner(), subscription);
}

#[tokio::test]
async fn watch_unauthorized() {
    init_logging();
    let server = MockServer::start().await;
    let client = Client::builder().base_url(server.uri()).build().unwrap();

    Mock::given(method("PUT"))
        .and(path("/user/subscriptions/alice/repo1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Requires authentication" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .activity()
        .watching()
        .watch("alice", "repo1", Params::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn unwatch() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/user/subscriptions/alice/repo1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .activity()
        .watching()
        .unwatch("alice", "repo1", Params::new())
        .await
        .unwrap();
    assert_eq!(*response.data(), Value::Null);
}

#[tokio::test]
async fn blank_identifiers_never_reach_the_server() {
    let (server, client) = setup().await;
    let watching = client.activity().watching();

    assert!(matches!(
        watching.list("", "repo1", Params::new()).await,
        Err(Error::MissingParameter("owner"))
    ));
    assert!(matches!(
        watching.is_watching("alice", " ", Params::new()).await,
        Err(Error::MissingParameter("repo"))
    ));
    assert!(matches!(
        watching.watch("", "", Params::new()).await,
        Err(Error::MissingParameter("owner"))
    ));
    assert!(matches!(
        watching.unwatch("alice", "", Params::new()).await,
        Err(Error::MissingParameter("repo"))
    ));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn identifiers_stay_within_their_segment() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/subscriptions/alice/repo1%3Fx=1%23f"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/user/subscriptions/a%2Fb/repo1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let watching = client.activity().watching();
    assert!(watching
        .is_watching("alice", "repo1?x=1#f", Params::new())
        .await
        .unwrap());
    watching.unwatch("a/b", "repo1", Params::new()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.url.query().is_none()));
}

#[tokio::test]
async fn dot_segments_never_reach_the_server() {
    let (server, client) = setup().await;
    let watching = client.activity().watching();

    assert!(matches!(
        watching.unwatch("..", "..", Params::new()).await,
        Err(Error::InvalidParameter("owner", _))
    ));
    assert!(matches!(
        watching.watch("alice", ".", Params::new()).await,
        Err(Error::InvalidParameter("repo", _))
    ));

    assert!(server.received_requests().await.unwrap().is_empty());
}
