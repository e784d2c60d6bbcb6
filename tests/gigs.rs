mod common;

use bandstand::{
    db::models::GigStatus,
    gigs::{
        create_gig, gig_with_venue, gigs_by_venue, open_gigs, set_gig_status, GigFilters, NewGig,
    },
    AppError,
};
use common::{gig_input, musician, open_gig, test_pool, venue};

#[tokio::test]
async fn only_venues_may_post_gigs() {
    let pool = test_pool().await;
    let pat = musician(&pool, "pat@example.com").await;

    let err = create_gig(&pool, pat.id, gig_input("Open mic"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn listing_shows_open_gigs_only() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;

    let open = open_gig(&pool, &club, "Friday night").await;
    let closed = open_gig(&pool, &club, "Cancelled show").await;
    let filled = open_gig(&pool, &club, "Booked show").await;
    set_gig_status(&pool, club.id, closed.id, GigStatus::Closed)
        .await
        .unwrap();
    set_gig_status(&pool, club.id, filled.id, GigStatus::Filled)
        .await
        .unwrap();

    let listed = open_gigs(&pool, &GigFilters::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].gig.id, open.id);

    // the venue's own listing still shows everything
    let all = gigs_by_venue(&pool, club.id).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn each_filter_narrows_and_they_combine_as_and() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;

    create_gig(
        &pool,
        club.id,
        NewGig {
            location: "Portland, OR".to_owned(),
            date: "2026-10-01".to_owned(),
            pay_min: 200,
            pay_max: 400,
            genres: vec!["Jazz".to_owned()],
            ..gig_input("Jazz in Portland")
        },
    )
    .await
    .unwrap();
    create_gig(
        &pool,
        club.id,
        NewGig {
            location: "Seattle, WA".to_owned(),
            date: "2026-11-15".to_owned(),
            pay_min: 500,
            pay_max: 800,
            genres: vec!["Rock".to_owned(), "Indie".to_owned()],
            ..gig_input("Rock in Seattle")
        },
    )
    .await
    .unwrap();

    let by_location = open_gigs(
        &pool,
        &GigFilters {
            location: Some("portland".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_location.len(), 1);
    assert_eq!(by_location[0].gig.title, "Jazz in Portland");

    let by_date = open_gigs(
        &pool,
        &GigFilters {
            date_from: Some("2026-11-01".to_owned()),
            date_to: Some("2026-12-01".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_date.len(), 1);
    assert_eq!(by_date[0].gig.title, "Rock in Seattle");

    let by_pay = open_gigs(
        &pool,
        &GigFilters {
            pay_min: Some(300),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_pay.len(), 1);
    assert_eq!(by_pay[0].gig.title, "Rock in Seattle");

    // cap on the gig's top-end pay: 400 fits under 450, 800 does not
    let by_pay_cap = open_gigs(
        &pool,
        &GigFilters {
            pay_max: Some(450),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_pay_cap.len(), 1);
    assert_eq!(by_pay_cap[0].gig.title, "Jazz in Portland");

    // a gig whose ceiling exceeds the cap is excluded even when its floor fits
    let under_everything = open_gigs(
        &pool,
        &GigFilters {
            pay_max: Some(300),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(under_everything.is_empty());

    let by_genre = open_gigs(
        &pool,
        &GigFilters {
            genres: Some("Jazz,Funk".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_genre.len(), 1);
    assert_eq!(by_genre[0].gig.title, "Jazz in Portland");

    // AND: location matches one gig, genre the other, together nothing
    let combined = open_gigs(
        &pool,
        &GigFilters {
            location: Some("Seattle".to_owned()),
            genres: Some("Jazz".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(combined.is_empty());
}

#[tokio::test]
async fn listing_orders_by_date_and_expands_the_venue() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;

    create_gig(
        &pool,
        club.id,
        NewGig {
            date: "2026-12-01".to_owned(),
            ..gig_input("Later")
        },
    )
    .await
    .unwrap();
    create_gig(
        &pool,
        club.id,
        NewGig {
            date: "2026-09-01".to_owned(),
            ..gig_input("Sooner")
        },
    )
    .await
    .unwrap();

    let listed = open_gigs(&pool, &GigFilters::default()).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].gig.title, "Sooner");
    assert_eq!(listed[1].gig.title, "Later");
    assert_eq!(listed[0].venue.as_ref().unwrap().id, club.id);
}

#[tokio::test]
async fn gig_detail_includes_the_venue() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;
    let gig = open_gig(&pool, &club, "Friday night").await;

    let detail = gig_with_venue(&pool, gig.id).await.unwrap().unwrap();
    assert_eq!(detail.gig.id, gig.id);
    assert_eq!(detail.venue.unwrap().name, "The Blue Note");
}

#[tokio::test]
async fn only_the_owning_venue_changes_status() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;
    let rival = venue(&pool, "rival@example.com").await;
    let gig = open_gig(&pool, &club, "Friday night").await;

    let err = set_gig_status(&pool, rival.id, gig.id, GigStatus::Closed)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let updated = set_gig_status(&pool, club.id, gig.id, GigStatus::Closed)
        .await
        .unwrap();
    assert_eq!(updated.status, GigStatus::Closed);
}

#[tokio::test]
async fn required_fields_are_validated() {
    let pool = test_pool().await;
    let club = venue(&pool, "club@example.com").await;

    let err = create_gig(
        &pool,
        club.id,
        NewGig {
            title: "   ".to_owned(),
            ..gig_input("ignored")
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}
