use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use confetti_sync::{
    SyncConfig, SyncError, SyncOutcome, Synchronizer, Transport, TransportError,
};
use tempfile::TempDir;

const COMPONENTS_URL: &str = "http://api.example.test/parser/source/components";
const STANDARD_URL: &str = "http://api.example.test/parser/source/components/standard";

/// In-memory authoring service keyed by `url` or `url?file=<value>`.
#[derive(Default)]
struct FakeService {
    routes: HashMap<String, Result<String, u16>>,
    hits: Mutex<Vec<String>>,
}

impl FakeService {
    fn component(mut self, file: &str, body: &str) -> Self {
        self.routes
            .insert(format!("{COMPONENTS_URL}?file=/{file}"), Ok(body.to_string()));
        self
    }

    fn standard(mut self, body: &str) -> Self {
        self.routes.insert(STANDARD_URL.to_string(), Ok(body.to_string()));
        self
    }

    fn failing_standard(mut self, status: u16) -> Self {
        self.routes.insert(STANDARD_URL.to_string(), Err(status));
        self
    }
}

impl Transport for FakeService {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String, TransportError> {
        let key = match query.first() {
            Some((name, value)) => format!("{url}?{name}={value}"),
            None => url.to_string(),
        };
        self.hits.lock().unwrap().push(key.clone());
        match self.routes.get(&key) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(TransportError::Status {
                url: url.to_string(),
                status: *status,
                body: String::new(),
            }),
            None => Ok("[]".to_string()),
        }
    }
}

fn synchronizer(root: &Path, service: FakeService) -> (Synchronizer, Arc<FakeService>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let service = Arc::new(service);
    let sync = Synchronizer::new(
        root,
        &SyncConfig::new("example.test"),
        Box::new(Arc::clone(&service)),
    )
    .expect("synchronizer");
    (sync, service)
}

fn component_body(name: &str, php: &str) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};
    format!(
        r#"[{{"name_class":"{name}","content":"{}"}}]"#,
        STANDARD.encode(php)
    )
}

fn count_files(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .map(|e| {
            if e.file_type().unwrap().is_dir() {
                count_files(&e.path())
            } else {
                1
            }
        })
        .sum()
}

#[test]
fn definition_change_writes_component_and_map() {
    let root = TempDir::new().unwrap();
    let service = FakeService::default().component(
        "view/ArticleComponent.blade.php",
        &component_body("Article", "<?php class Article {}"),
    );
    let (sync, _) = synchronizer(root.path(), service);

    let outcome = sync
        .upsert_hidden_component("view/ArticleComponent.blade.php", false)
        .unwrap();
    assert!(outcome.is_handled());

    let components = root.path().join(".confetti/Components");
    assert_eq!(
        fs::read_to_string(components.join("Article.php")).unwrap(),
        "<?php class Article {}"
    );
    let map = fs::read_to_string(components.join("Map.php")).unwrap();
    assert!(map.contains("public function article(string $key): Article"));
}

#[test]
fn class_change_fetches_definition_key() {
    let root = TempDir::new().unwrap();
    let service = FakeService::default().component(
        "view/page.component.blade.php",
        &component_body("Page", "<?php class Page {}"),
    );
    let (sync, service) = synchronizer(root.path(), service);

    let outcome = sync
        .upsert_hidden_component("view/page.component.class.php", false)
        .unwrap();
    match outcome {
        SyncOutcome::Synced { component, .. } => assert_eq!(component.as_str(), "Page"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        service.hits.lock().unwrap().clone(),
        vec![format!("{COMPONENTS_URL}?file=/view/page.component.blade.php")]
    );
}

#[test]
fn irrelevant_path_does_nothing() {
    let root = TempDir::new().unwrap();
    let (sync, service) = synchronizer(root.path(), FakeService::default());

    let outcome = sync.upsert_hidden_component("src/main.css", true).unwrap();
    assert_eq!(outcome, SyncOutcome::NotRelevant);
    assert!(service.hits.lock().unwrap().is_empty(), "no request made");
    assert!(!root.path().join(".confetti").exists(), "no filesystem writes");
}

#[test]
fn unknown_component_is_not_found_and_writes_nothing() {
    let root = TempDir::new().unwrap();
    let (sync, _) = synchronizer(root.path(), FakeService::default());

    let err = sync
        .upsert_hidden_component("view/GoneComponent.blade.php", false)
        .unwrap_err();
    assert!(matches!(err, SyncError::NotFound { .. }));
    assert_eq!(count_files(&root.path().join(".confetti")), 0);
}

#[test]
fn map_lists_every_mirrored_component() {
    let root = TempDir::new().unwrap();
    let components = root.path().join(".confetti/Components");
    fs::create_dir_all(&components).unwrap();
    fs::write(components.join("Page.php"), "<?php").unwrap();
    fs::write(components.join("helper.php"), "<?php").unwrap();

    let service = FakeService::default().component(
        "view/ArticleComponent.blade.php",
        &component_body("Article", "<?php"),
    );
    let (sync, _) = synchronizer(root.path(), service);
    sync.upsert_hidden_component("view/ArticleComponent.blade.php", false)
        .unwrap();

    let map = fs::read_to_string(components.join("Map.php")).unwrap();
    assert_eq!(map.matches("public function ").count(), 2);
    assert!(map.find("function article").unwrap() < map.find("function page").unwrap());
    assert!(!map.contains("helper"));
}

#[test]
fn map_rebuild_is_repeatable() {
    let root = TempDir::new().unwrap();
    let components = root.path().join(".confetti/Components");
    fs::create_dir_all(&components).unwrap();
    for name in ["Article.php", "Page.php", "Map.php", "helper.php"] {
        fs::write(components.join(name), "<?php").unwrap();
    }
    let (sync, _) = synchronizer(root.path(), FakeService::default());

    sync.upsert_hidden_map(false).unwrap();
    let first = fs::read(components.join("Map.php")).unwrap();
    sync.upsert_hidden_map(false).unwrap();
    let second = fs::read(components.join("Map.php")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn standard_set_is_written_without_map() {
    let root = TempDir::new().unwrap();
    let service = FakeService::default().standard(
        r#"[{"file":"a/b.php","content":"aGVsbG8="},{"file":"c.php","content":"d29ybGQ="}]"#,
    );
    let (sync, _) = synchronizer(root.path(), service);

    let writes = sync.save_standard_hidden_files(false).unwrap();
    assert_eq!(writes.len(), 2);

    let hidden = root.path().join(".confetti");
    assert_eq!(fs::read_to_string(hidden.join("a/b.php")).unwrap(), "hello");
    assert_eq!(fs::read_to_string(hidden.join("c.php")).unwrap(), "world");
    assert!(!hidden.join("Components/Map.php").exists(), "no Map rebuild");
}

#[test]
fn escaping_standard_path_writes_nothing() {
    let root = TempDir::new().unwrap();
    let service = FakeService::default().standard(
        r#"[{"file":"ok.php","content":"aGVsbG8="},{"file":"../evil.php","content":"d29ybGQ="}]"#,
    );
    let (sync, _) = synchronizer(root.path(), service);

    let err = sync.save_standard_hidden_files(false).unwrap_err();
    assert!(matches!(err, SyncError::UnsafePath { .. }));
    assert!(!root.path().join(".confetti/ok.php").exists());
    assert!(!root.path().join("evil.php").exists());
}

#[test]
fn transport_failure_propagates_once() {
    let root = TempDir::new().unwrap();
    let (sync, service) = synchronizer(root.path(), FakeService::default().failing_standard(502));

    let err = sync.save_standard_hidden_files(false).unwrap_err();
    assert!(matches!(
        err,
        SyncError::Transport(TransportError::Status { status: 502, .. })
    ));
    assert_eq!(service.hits.lock().unwrap().len(), 1);
}

#[test]
fn map_failure_keeps_component_and_is_recoverable() {
    let root = TempDir::new().unwrap();
    let service = FakeService::default().component(
        "view/ArticleComponent.blade.php",
        &component_body("Article", "<?php"),
    );
    let (sync, _) = synchronizer(root.path(), service);

    let components = root.path().join(".confetti/Components");
    fs::create_dir_all(components.join("Map.php")).unwrap();

    let err = sync
        .upsert_hidden_component("view/ArticleComponent.blade.php", false)
        .unwrap_err();
    assert!(matches!(err, SyncError::Io { .. }));
    assert!(components.join("Article.php").is_file(), "component already written");

    fs::remove_dir(components.join("Map.php")).unwrap();
    sync.upsert_hidden_map(false).unwrap();
    let map = fs::read_to_string(components.join("Map.php")).unwrap();
    assert!(map.contains("function article"));
}

#[test]
fn hostile_component_name_writes_nothing() {
    for name in ["../../escaped", "Nested/Deep"] {
        let root = TempDir::new().unwrap();
        let project = root.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let service = FakeService::default().component(
            "view/AComponent.blade.php",
            &format!(r#"[{{"name_class":"{name}","content":"aGVsbG8="}}]"#),
        );
        let (sync, _) = synchronizer(&project, service);

        let err = sync
            .upsert_hidden_component("view/AComponent.blade.php", false)
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidName { .. }), "{name}: {err:?}");
        assert_eq!(count_files(root.path()), 0, "{name}: nothing written anywhere");
    }
}

#[test]
fn invalid_base64_component_writes_nothing() {
    let root = TempDir::new().unwrap();
    let service = FakeService::default().component(
        "view/ArticleComponent.blade.php",
        r#"[{"name_class":"Article","content":"!!not base64!!"}]"#,
    );
    let (sync, _) = synchronizer(root.path(), service);

    let err = sync
        .upsert_hidden_component("view/ArticleComponent.blade.php", false)
        .unwrap_err();
    assert!(matches!(err, SyncError::Decode(_)));
    assert_eq!(count_files(&root.path().join(".confetti")), 0);
}

#[test]
fn reloaded_template_applies_to_next_map_rebuild() {
    let root = TempDir::new().unwrap();
    let service = FakeService::default().component(
        "view/ArticleComponent.blade.php",
        &component_body("Article", "<?php"),
    );
    let (sync, _) = synchronizer(root.path(), service);
    sync.upsert_hidden_component("view/ArticleComponent.blade.php", false)
        .unwrap();

    let overrides = root.path().join(".confetti-templates");
    fs::create_dir_all(&overrides).unwrap();
    fs::write(
        overrides.join("Map.php.tera"),
        "{% for a in accessors %}{{ a.function }}:{{ a.class_name }}\n{% endfor %}",
    )
    .unwrap();

    let map_path = root.path().join(".confetti/Components/Map.php");
    sync.upsert_hidden_map(false).unwrap();
    assert!(fs::read_to_string(&map_path).unwrap().contains("class Map"));

    sync.reload_templates().unwrap();
    sync.upsert_hidden_map(false).unwrap();
    assert_eq!(fs::read_to_string(&map_path).unwrap(), "article:Article\n");
}

#[test]
fn broken_template_reload_keeps_previous_template() {
    let root = TempDir::new().unwrap();
    let (sync, _) = synchronizer(root.path(), FakeService::default());

    let overrides = root.path().join(".confetti-templates");
    fs::create_dir_all(&overrides).unwrap();
    fs::write(overrides.join("Map.php.tera"), "{% for a in accessors %}unterminated").unwrap();

    assert!(matches!(sync.reload_templates(), Err(SyncError::Template(_))));
    let result = sync.upsert_hidden_map(false).unwrap();
    assert!(fs::read_to_string(result.path).unwrap().contains("class Map"));
}
