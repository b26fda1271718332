use super::*;

fn control() -> RateControl {
    RateControl::new(RateControlId(3), "Blue Ocean Logistics", "Steel coils")
}

fn rate_all(modal: &mut RatingModal) {
    for (criterion, stars) in Criterion::ALL.into_iter().zip([5, 4, 3, 5]) {
        modal.select(criterion, stars).expect("select");
    }
}

#[test]
fn open_builds_prompt_and_clears_previous_selection() {
    let mut modal = RatingModal::new();
    modal.open(&control()).expect("open");
    modal.select(Criterion::Price, 2).expect("select");

    let prompt = modal.open(&control()).expect("reopen");

    assert_eq!(prompt.forwarder_name, "Blue Ocean Logistics");
    assert_eq!(prompt.item_label, "'Steel coils'");
    assert!(Criterion::ALL
        .into_iter()
        .all(|criterion| modal.rating(criterion).is_none()));
    assert_eq!(modal.pending_control(), Some(RateControlId(3)));
}

#[test]
fn disabled_control_does_not_open() {
    let mut rated = control();
    rated.mark_rated();
    let mut modal = RatingModal::new();

    assert_eq!(
        modal.open(&rated),
        Err(RatingError::ControlDisabled(RateControlId(3)))
    );
    assert!(!modal.is_open());
}

#[test]
fn incomplete_submit_keeps_modal_open() {
    let mut modal = RatingModal::new();
    modal.open(&control()).expect("open");
    modal.select(Criterion::Overall, 5).expect("select");
    modal.select(Criterion::Stability, 1).expect("select");

    assert_eq!(
        modal.submit(),
        Err(RatingError::Incomplete {
            missing: vec![Criterion::Price, Criterion::Speed]
        })
    );
    assert!(modal.is_open());
    assert_eq!(modal.rating(Criterion::Overall).map(Stars::get), Some(5));
}

#[test]
fn complete_submit_returns_ratings_and_clears_target() {
    let mut modal = RatingModal::new();
    modal.open(&control()).expect("open");
    rate_all(&mut modal);

    let submission = modal.submit().expect("submit");

    assert_eq!(submission.control, RateControlId(3));
    assert_eq!(submission.item_name, "Steel coils");
    assert_eq!(
        [
            submission.overall,
            submission.price,
            submission.speed,
            submission.stability
        ]
        .map(Stars::get),
        [5, 4, 3, 5]
    );
    assert!(!modal.is_open());
    assert_eq!(modal.submit(), Err(RatingError::NotOpen));
}

#[test]
fn stars_must_be_one_to_five() {
    let mut modal = RatingModal::new();
    assert_eq!(modal.select(Criterion::Speed, 3), Err(RatingError::NotOpen));

    modal.open(&control()).expect("open");
    assert_eq!(
        modal.select(Criterion::Speed, 0),
        Err(RatingError::OutOfRange(0))
    );
    assert_eq!(
        modal.select(Criterion::Speed, 6),
        Err(RatingError::OutOfRange(6))
    );
    assert!(modal.rating(Criterion::Speed).is_none());
}

#[test]
fn close_clears_pending_control() {
    let mut modal = RatingModal::new();
    modal.open(&control()).expect("open");
    modal.close();
    assert_eq!(modal.pending_control(), None);
}

#[test]
fn control_flips_to_rated_once() {
    let mut control = control();
    assert!(control.mark_rated());
    assert_eq!(control.label, "Rated");
    assert!(control.disabled);
    assert!(!control.has_class("btn-outline"));
    assert!(control.has_class("btn-rated"));

    let snapshot = control.clone();
    assert!(!control.mark_rated());
    assert_eq!(control, snapshot);
}
