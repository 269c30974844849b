use spotitag::{
    store::{EntityKind, SqliteTagStore, TagStore, UserId},
    tagging::{self, ReconcileReport},
};

const ARTIST: &str = "4Z8W4fKeB5YxbusRsdQVPb";
const ALBUM: &str = "6dVIqQ8qmQ5GBnJ9shOYGE";

fn setup() -> (SqliteTagStore, UserId) {
    let store = SqliteTagStore::in_memory().unwrap();
    let user = store.create_user("alice", "alice@example.com", "hash").unwrap();
    (store, user.id)
}

fn labels(store: &SqliteTagStore, user_id: UserId, kind: EntityKind, id: &str) -> Vec<String> {
    let mut labels: Vec<String> = tagging::entity_labels(store, user_id, kind, id)
        .unwrap()
        .into_iter()
        .map(|t| t.label)
        .collect();
    labels.sort();
    labels
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_parse_labels() {
    assert_eq!(tagging::parse_labels("good;live"), strings(&["good", "live"]));
    assert_eq!(tagging::parse_labels(" good ; ;live;"), strings(&["good", "live"]));
    assert_eq!(tagging::parse_labels("live;good;live"), strings(&["live", "good"]));
    assert!(tagging::parse_labels("").is_empty());
    assert!(tagging::parse_labels(" ; ;").is_empty());
}

#[test]
fn test_parse_labels_is_case_sensitive() {
    assert_eq!(tagging::parse_labels("Live;live"), strings(&["Live", "live"]));
}

#[test]
fn test_first_tagging_creates_and_links() {
    let (store, user_id) = setup();

    let report =
        tagging::set_entity_tags(&store, user_id, EntityKind::Artist, ARTIST, "good;live").unwrap();

    assert_eq!(report.created, strings(&["good", "live"]));
    assert_eq!(report.linked, strings(&["good", "live"]));
    assert!(report.unlinked.is_empty());
    assert_eq!(labels(&store, user_id, EntityKind::Artist, ARTIST), strings(&["good", "live"]));
}

#[test]
fn test_replacing_tags_adds_and_removes() {
    let (store, user_id) = setup();
    tagging::set_entity_tags(&store, user_id, EntityKind::Artist, ARTIST, "good;live").unwrap();

    let report =
        tagging::set_entity_tags(&store, user_id, EntityKind::Artist, ARTIST, "good;new").unwrap();

    assert_eq!(report.created, strings(&["new"]));
    assert_eq!(report.linked, strings(&["new"]));
    assert_eq!(report.unlinked, strings(&["live"]));
    assert_eq!(labels(&store, user_id, EntityKind::Artist, ARTIST), strings(&["good", "new"]));

    // "live" stays in the user's vocabulary
    let owned: Vec<String> = store
        .user_tags(user_id)
        .unwrap()
        .into_iter()
        .map(|t| t.label)
        .collect();
    assert!(owned.contains(&"live".to_string()));
    assert_eq!(owned.len(), 3);
}

#[test]
fn test_same_set_twice_is_a_noop() {
    let (store, user_id) = setup();
    tagging::set_entity_tags(&store, user_id, EntityKind::Album, ALBUM, "good;live").unwrap();

    let report =
        tagging::set_entity_tags(&store, user_id, EntityKind::Album, ALBUM, "live;good").unwrap();

    assert_eq!(report, ReconcileReport::default());
    assert!(report.is_noop());
    assert_eq!(store.user_tags(user_id).unwrap().len(), 2);
}

#[test]
fn test_existing_tags_are_reused_across_entities() {
    let (store, user_id) = setup();
    tagging::set_entity_tags(&store, user_id, EntityKind::Artist, ARTIST, "good").unwrap();

    let report =
        tagging::set_entity_tags(&store, user_id, EntityKind::Album, ALBUM, "good").unwrap();

    assert!(report.created.is_empty());
    assert_eq!(report.linked, strings(&["good"]));
    assert_eq!(store.user_tags(user_id).unwrap().len(), 1);
}

#[test]
fn test_empty_set_unlinks_everything_but_keeps_tags() {
    let (store, user_id) = setup();
    tagging::set_entity_tags(&store, user_id, EntityKind::Artist, ARTIST, "good;live").unwrap();

    let report = tagging::set_entity_tags(&store, user_id, EntityKind::Artist, ARTIST, "").unwrap();

    assert!(report.created.is_empty());
    assert!(report.linked.is_empty());
    assert_eq!(report.unlinked.len(), 2);
    assert!(labels(&store, user_id, EntityKind::Artist, ARTIST).is_empty());
    assert_eq!(store.user_tags(user_id).unwrap().len(), 2);
}

#[test]
fn test_reconcile_with_duplicate_desired_labels() {
    let (store, user_id) = setup();
    let entity = store.get_or_create_entity(EntityKind::Artist, ARTIST).unwrap();

    let report = tagging::reconcile(&store, user_id, &entity, &strings(&["a", "a"])).unwrap();

    assert_eq!(report.created, strings(&["a"]));
    assert_eq!(store.user_tags(user_id).unwrap().len(), 1);
}

#[test]
fn test_users_do_not_see_each_others_tags() {
    let (store, alice) = setup();
    let bob = store.create_user("bob", "bob@example.com", "hash").unwrap().id;

    tagging::set_entity_tags(&store, alice, EntityKind::Artist, ARTIST, "good").unwrap();
    let report = tagging::set_entity_tags(&store, bob, EntityKind::Artist, ARTIST, "good").unwrap();

    // bob gets his own "good" tag
    assert_eq!(report.created, strings(&["good"]));

    // clearing bob's tags leaves alice's link alone
    tagging::set_entity_tags(&store, bob, EntityKind::Artist, ARTIST, "").unwrap();
    assert_eq!(labels(&store, alice, EntityKind::Artist, ARTIST), strings(&["good"]));
    assert!(labels(&store, bob, EntityKind::Artist, ARTIST).is_empty());
}

#[test]
fn test_join_labels() {
    let (store, user_id) = setup();
    tagging::set_entity_tags(&store, user_id, EntityKind::Artist, ARTIST, "good;live").unwrap();

    let tags = tagging::entity_labels(&store, user_id, EntityKind::Artist, ARTIST).unwrap();
    let joined = tagging::join_labels(&tags);

    let mut round: Vec<String> = tagging::parse_labels(&joined);
    round.sort();
    assert_eq!(round, strings(&["good", "live"]));
    assert_eq!(tagging::join_labels(&[]), "");
}

#[test]
fn test_tag_overview() {
    let (store, user_id) = setup();
    tagging::set_entity_tags(&store, user_id, EntityKind::Artist, ARTIST, "good;live").unwrap();
    tagging::set_entity_tags(&store, user_id, EntityKind::Album, ALBUM, "good").unwrap();
    tagging::set_entity_tags(&store, user_id, EntityKind::Artist, ARTIST, "good").unwrap();

    let overview = tagging::tag_overview(&store, user_id).unwrap();

    assert_eq!(overview.len(), 2);
    assert_eq!(overview[0].label, "good");
    assert_eq!(overview[0].artists, strings(&[ARTIST]));
    assert_eq!(overview[0].albums, strings(&[ALBUM]));
    // "live" no longer tags anything but is still listed
    assert_eq!(overview[1].label, "live");
    assert!(overview[1].artists.is_empty());
    assert!(overview[1].albums.is_empty());
}

#[test]
fn test_tag_overview_empty_for_new_user() {
    let (store, user_id) = setup();
    assert!(tagging::tag_overview(&store, user_id).unwrap().is_empty());
}
