use cmeet_feed::{FeedAssembler, FeedError, Strategy};
use cmeet_model::{Privacy, User};
use cmeet_ref::UserId;
use cmeet_store::social::{accept_friend, create_post, set_current_mood, PostDraft};
use cmeet_store::{DocumentStore, ManualClock, MemoryStore, StoreError};
use serde_json::json;

fn id(s: &str) -> UserId {
    s.to_string().try_into().unwrap()
}

fn user(id_str: &str) -> User {
    User {
        id: id(id_str),
        display_name: Some(id_str.to_string()),
        interests: String::new(),
        location: String::new(),
        current_mood: None,
        settings: Default::default(),
    }
}

async fn seed_user(store: &MemoryStore, id_str: &str) {
    store
        .set(
            &format!("users/{}", id_str),
            json!({ "displayName": id_str }),
        )
        .await
        .unwrap();
}

fn draft(content: &str, privacy: Privacy) -> PostDraft {
    PostDraft {
        content: content.to_string(),
        image_url: None,
        privacy,
        mood_tag: None,
        poll: None,
    }
}

#[tokio::test]
async fn test_latest_feed_applies_visibility() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    for name in ["a", "b", "c", "d"] {
        seed_user(&store, name).await;
    }
    accept_friend(&store, &id("a"), &id("b")).await.unwrap();

    // timestamps t1 < t2 < t3 < t4
    clock.set(1);
    let own_private = create_post(&store, &clock, &user("a"), draft("mine", Privacy::Private))
        .await
        .unwrap();
    clock.set(2);
    let friend_post = create_post(&store, &clock, &user("b"), draft("for friends", Privacy::Friends))
        .await
        .unwrap();
    clock.set(3);
    let public_post = create_post(&store, &clock, &user("c"), draft("for all", Privacy::Public))
        .await
        .unwrap();
    clock.set(4);
    // d is not a friend of a, so this one must not appear
    create_post(&store, &clock, &user("d"), draft("not visible", Privacy::Friends))
        .await
        .unwrap();

    let assembler = FeedAssembler::new(&store);
    let page = assembler
        .get_feed(&id("a"), Strategy::Latest, None)
        .await
        .unwrap();

    let got: Vec<&str> = page.posts.iter().map(|c| c.post.id.as_str()).collect();
    assert_eq!(
        got,
        vec![
            public_post.id.as_str(),
            friend_post.id.as_str(),
            own_private.id.as_str()
        ]
    );
    assert!(page.next_page.is_none());
    assert!(!page.mood_fallback);
}

#[tokio::test]
async fn test_chronological_setting_overrides_popular() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    store
        .set(
            "users/a",
            json!({ "displayName": "a", "settings": { "chronologicalFeed": true } }),
        )
        .await
        .unwrap();
    seed_user(&store, "b").await;

    clock.set(1);
    let older = create_post(&store, &clock, &user("b"), draft("older", Privacy::Public))
        .await
        .unwrap();
    clock.set(2);
    let newer = create_post(&store, &clock, &user("b"), draft("newer", Privacy::Public))
        .await
        .unwrap();
    // make the older post by far the most engaging
    for n in 0..5 {
        cmeet_store::social::toggle_reaction(
            &store,
            &older.id,
            &id(&format!("u{}", n)),
            cmeet_model::Reaction::like(),
        )
        .await
        .unwrap();
    }

    let assembler = FeedAssembler::new(&store);
    let page = assembler
        .get_feed(&id("a"), Strategy::Popular, None)
        .await
        .unwrap();
    let got: Vec<&str> = page.posts.iter().map(|c| c.post.id.as_str()).collect();
    assert_eq!(got, vec![newer.id.as_str(), older.id.as_str()]);
}

#[tokio::test]
async fn test_mood_feed_and_fallback_flag() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    seed_user(&store, "a").await;
    seed_user(&store, "b").await;
    set_current_mood(&store, &clock, &id("a"), "happy".to_string())
        .await
        .unwrap();

    clock.set(1);
    let mut happy_draft = draft("good news", Privacy::Public);
    happy_draft.mood_tag = Some("happy".to_string());
    let happy = create_post(&store, &clock, &user("b"), happy_draft)
        .await
        .unwrap();
    clock.set(2);
    let mut sad_draft = draft("bad news", Privacy::Public);
    sad_draft.mood_tag = Some("sad".to_string());
    create_post(&store, &clock, &user("b"), sad_draft).await.unwrap();

    let assembler = FeedAssembler::new(&store);
    let page = assembler.get_feed(&id("a"), Strategy::Mood, None).await.unwrap();
    let got: Vec<&str> = page.posts.iter().map(|c| c.post.id.as_str()).collect();
    assert_eq!(got, vec![happy.id.as_str()]);
    assert!(!page.mood_fallback);

    // viewer switches to a mood nothing matches: all candidates come back,
    // flagged so the caller shows the empty-state message
    set_current_mood(&store, &clock, &id("a"), "curious".to_string())
        .await
        .unwrap();
    let page = assembler.get_feed(&id("a"), Strategy::Mood, None).await.unwrap();
    assert_eq!(page.posts.len(), 2);
    assert!(page.mood_fallback);
}

#[tokio::test]
async fn test_pagination_cursor_walks_the_ranked_order() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    seed_user(&store, "a").await;
    seed_user(&store, "b").await;

    for n in 0..5 {
        clock.set(n + 1);
        create_post(&store, &clock, &user("b"), draft(&format!("post {}", n), Privacy::Public))
            .await
            .unwrap();
    }

    let mut assembler = FeedAssembler::new(&store);
    assembler.page_size = 2;

    let first = assembler.get_feed(&id("a"), Strategy::Latest, None).await.unwrap();
    assert_eq!(first.posts.len(), 2);
    let second = assembler
        .get_feed(&id("a"), Strategy::Latest, first.next_page)
        .await
        .unwrap();
    assert_eq!(second.posts.len(), 2);
    let third = assembler
        .get_feed(&id("a"), Strategy::Latest, second.next_page)
        .await
        .unwrap();
    assert_eq!(third.posts.len(), 1);
    assert!(third.next_page.is_none());

    let mut timestamps: Vec<i64> = Vec::new();
    for page in [&first, &second, &third] {
        timestamps.extend(page.posts.iter().map(|c| c.post.timestamp_ms));
    }
    assert_eq!(timestamps, vec![5, 4, 3, 2, 1]);
}

#[tokio::test]
async fn test_unknown_viewer_is_not_authenticated() {
    let store = MemoryStore::new();
    let assembler = FeedAssembler::new(&store);
    let err = assembler
        .get_feed(&id("ghost"), Strategy::Latest, None)
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::NotAuthenticated));
}

#[tokio::test]
async fn test_unreachable_store_surfaces_typed_error() {
    let store = MemoryStore::new();
    seed_user(&store, "a").await;
    store.set_offline(true);

    let assembler = FeedAssembler::new(&store);
    let err = assembler
        .get_feed(&id("a"), Strategy::Latest, None)
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::Store(StoreError::Unavailable(_))));
}
