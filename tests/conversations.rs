mod common;

use bandstand::{
    conversations::{
        conversations_for_user, mark_read, messages_in, open_conversation, send_message,
    },
    AppError,
};
use common::{musician, open_gig, test_pool, venue};

#[tokio::test]
async fn opening_twice_reuses_the_thread() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;
    let pat = musician(&pool, "pat@example.com").await;

    let first = open_conversation(&pool, pat.id, club.id, None).await.unwrap();
    // either side may initiate; the same pair lands in the same thread
    let second = open_conversation(&pool, club.id, pat.id, None).await.unwrap();
    assert_eq!(first.conversation.id, second.conversation.id);
    assert_eq!(first.conversation.musician_id, pat.id);
    assert_eq!(first.conversation.venue_id, club.id);
}

#[tokio::test]
async fn gig_scoped_threads_are_distinct_from_the_general_one() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;
    let pat = musician(&pool, "pat@example.com").await;
    let gig = open_gig(&pool, &club, "Friday night").await;

    let general = open_conversation(&pool, pat.id, club.id, None).await.unwrap();
    let scoped = open_conversation(&pool, pat.id, club.id, Some(gig.id))
        .await
        .unwrap();
    assert_ne!(general.conversation.id, scoped.conversation.id);
    assert_eq!(scoped.gig.as_ref().unwrap().id, gig.id);
}

#[tokio::test]
async fn the_general_thread_is_unique_per_pair() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;
    let pat = musician(&pool, "pat@example.com").await;
    let first = open_conversation(&pool, pat.id, club.id, None).await.unwrap();

    // emulate a second caller racing past the existence probe: the raw
    // insert must hit the partial unique index, not create a twin thread
    let err = sqlx::query(
        "INSERT INTO conversations (id, gig_id, application_id, musician_id, venue_id, created_at, updated_at) \
         VALUES (?,NULL,NULL,?,?,?,?)",
    )
    .bind(uuid::Uuid::now_v7())
    .bind(pat.id)
    .bind(club.id)
    .bind(time::OffsetDateTime::now_utc())
    .bind(time::OffsetDateTime::now_utc())
    .execute(&pool)
    .await
    .unwrap_err();
    assert!(bandstand::error::is_unique_violation(&err));

    let again = open_conversation(&pool, pat.id, club.id, None).await.unwrap();
    assert_eq!(again.conversation.id, first.conversation.id);
}

#[tokio::test]
async fn a_conversation_needs_one_of_each_role() {
    let pool = test_pool().await;
    let pat = musician(&pool, "pat@example.com").await;
    let sam = musician(&pool, "sam@example.com").await;

    let err = open_conversation(&pool, pat.id, sam.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn messages_arrive_in_order_with_senders() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;
    let pat = musician(&pool, "pat@example.com").await;
    let thread = open_conversation(&pool, pat.id, club.id, None).await.unwrap();
    let id = thread.conversation.id;

    send_message(&pool, pat.id, id, "Do you have a backline?".to_owned())
        .await
        .unwrap();
    send_message(&pool, club.id, id, "Full kit and a DI box.".to_owned())
        .await
        .unwrap();
    send_message(&pool, pat.id, id, "Great, see you Friday.".to_owned())
        .await
        .unwrap();

    let history = messages_in(&pool, club.id, id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].message.content, "Do you have a backline?");
    assert_eq!(history[1].message.content, "Full kit and a DI box.");
    assert_eq!(history[2].message.content, "Great, see you Friday.");
    assert_eq!(history[0].sender.as_ref().unwrap().id, pat.id);
    assert_eq!(history[1].sender.as_ref().unwrap().id, club.id);
}

#[tokio::test]
async fn outsiders_stay_out() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;
    let pat = musician(&pool, "pat@example.com").await;
    let lurker = musician(&pool, "lurker@example.com").await;
    let thread = open_conversation(&pool, pat.id, club.id, None).await.unwrap();
    let id = thread.conversation.id;

    let err = messages_in(&pool, lurker.id, id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = send_message(&pool, lurker.id, id, "hi".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn mark_read_stamps_only_the_other_sides_messages() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;
    let pat = musician(&pool, "pat@example.com").await;
    let thread = open_conversation(&pool, pat.id, club.id, None).await.unwrap();
    let id = thread.conversation.id;

    send_message(&pool, pat.id, id, "one".to_owned()).await.unwrap();
    send_message(&pool, pat.id, id, "two".to_owned()).await.unwrap();
    send_message(&pool, club.id, id, "reply".to_owned()).await.unwrap();

    let marked = mark_read(&pool, club.id, id).await.unwrap();
    assert_eq!(marked, 2);

    let history = messages_in(&pool, club.id, id).await.unwrap();
    for entry in &history {
        if entry.message.sender_id == pat.id {
            assert!(entry.message.read_at.is_some());
        } else {
            assert!(entry.message.read_at.is_none());
        }
    }

    // nothing left to stamp
    assert_eq!(mark_read(&pool, club.id, id).await.unwrap(), 0);
}

#[tokio::test]
async fn fresh_activity_floats_to_the_top() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;
    let pat = musician(&pool, "pat@example.com").await;
    let sam = musician(&pool, "sam@example.com").await;

    let with_pat = open_conversation(&pool, pat.id, club.id, None).await.unwrap();
    let with_sam = open_conversation(&pool, sam.id, club.id, None).await.unwrap();

    send_message(&pool, pat.id, with_pat.conversation.id, "hello again".to_owned())
        .await
        .unwrap();

    let threads = conversations_for_user(&pool, club.id).await.unwrap();
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0].conversation.id, with_pat.conversation.id);
    assert_eq!(threads[1].conversation.id, with_sam.conversation.id);
    assert_eq!(
        threads[0].last_message.as_ref().unwrap().content,
        "hello again"
    );
    assert!(threads[1].last_message.is_none());
}
