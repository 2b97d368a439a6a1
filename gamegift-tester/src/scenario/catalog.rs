use anyhow::{Context, Result, ensure};
use std::convert::Infallible;

use super::CatalogScenario;
use gamegift_core::{
    AcknowledgementFlag, CaseFoldCollator, DisclaimerReason, Eligibility, EligibilityDisclaimer,
    FetchOutcome, FetchResolution, FormAction, GameRef, PurchaseRequest, PurchaseValidationError,
    Recipient, RecipientRoster, RecipientSelectionEngine, evaluate_age_eligibility,
    validate_purchase,
};

pub fn catalog_scenarios() -> Vec<CatalogScenario> {
    vec![
        CatalogScenario::new(
            "eligibility-table",
            "Age eligibility rules for every restriction/age combination",
            eligibility_table,
        ),
        CatalogScenario::new(
            "toggle-idempotence",
            "Checking then unchecking a recipient restores the selection",
            toggle_idempotence,
        ),
        CatalogScenario::new(
            "ineligible-selection",
            "Blocked recipients never join the selection and replace the disclaimer",
            ineligible_selection,
        ),
        CatalogScenario::new(
            "invite-panel-reset",
            "Closing the invite panel clears emails and acknowledgements",
            invite_panel_reset,
        ),
        CatalogScenario::new(
            "sparse-email-slots",
            "Writing past the last email slot pads with empty slots",
            sparse_email_slots,
        ),
        CatalogScenario::new(
            "restricted-game",
            "Rated 21+: self selectable, a 17 year old friend is blocked",
            restricted_game,
        ),
        CatalogScenario::new(
            "unrestricted-game",
            "No rating: friends with unknown ages are selected in click order",
            unrestricted_game,
        ),
        CatalogScenario::new(
            "stale-fetch",
            "A superseded friend fetch never replaces the roster",
            stale_fetch,
        ),
        CatalogScenario::new(
            "roster-order",
            "Roster is deduplicated and sorted by name ignoring case",
            roster_order,
        ),
        CatalogScenario::new(
            "purchase-validation",
            "Submit-time rules for recipients, emails and acknowledgements",
            purchase_validation,
        ),
    ]
}

pub fn find_catalog_scenario(key: &str) -> Option<CatalogScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

fn seeded_engine(me: Recipient, friends: Vec<Recipient>) -> Result<RecipientSelectionEngine> {
    let mut engine = RecipientSelectionEngine::new();
    let expected = friends.len() + 1;
    let ticket = engine
        .begin_fetch(Some(me))
        .context("signed-in user did not start a fetch")?;
    let outcome = engine.resolve_fetch(FetchResolution::new(ticket, Ok::<_, Infallible>(friends)));
    ensure!(
        outcome == FetchOutcome::Applied(expected),
        "expected roster of {expected}, got {outcome:?}"
    );
    Ok(engine)
}

fn invite(request: &PurchaseRequest, index: usize, email: &str) -> Result<PurchaseRequest> {
    request
        .with_invite_email(index, email)
        .with_context(|| format!("invite slot {index} rejected"))
}

fn eligibility_table() -> Result<()> {
    let cases = [
        (None, None, Eligibility::ELIGIBLE),
        (None, Some(3), Eligibility::ELIGIBLE),
        (Some(18), None, Eligibility::blocked(DisclaimerReason::AgeUnknown)),
        (
            Some(18),
            Some(16),
            Eligibility::blocked(DisclaimerReason::BelowMinimumAge),
        ),
        (Some(18), Some(18), Eligibility::ELIGIBLE),
        (Some(18), Some(40), Eligibility::ELIGIBLE),
        (Some(0), None, Eligibility::blocked(DisclaimerReason::AgeUnknown)),
    ];
    for (min_age, age, expected) in cases {
        let actual = evaluate_age_eligibility(min_age, age);
        ensure!(
            actual == expected,
            "min_age {min_age:?} / age {age:?}: expected {expected:?}, got {actual:?}"
        );
    }
    Ok(())
}

fn toggle_idempotence() -> Result<()> {
    let mut engine = seeded_engine(
        Recipient::new(1, "Mara", Some(30)),
        vec![Recipient::new(2, "Theo", Some(14))],
    )?;
    let mut current = PurchaseRequest::for_game(GameRef::new(9, "Kart Party"));
    current.selected_recipient_ids = vec![1];

    let on = engine
        .toggle_recipient(&current, 2, true)
        .context("checking an eligible friend emitted nothing")?;
    ensure!(on.selected_recipient_ids == vec![1, 2], "got {:?}", on.selected_recipient_ids);
    let off = engine
        .toggle_recipient(&on, 2, false)
        .context("unchecking emitted nothing")?;
    ensure!(
        off.selected_recipient_ids == current.selected_recipient_ids,
        "selection not restored: {:?}",
        off.selected_recipient_ids
    );
    Ok(())
}

fn ineligible_selection() -> Result<()> {
    let mut engine = seeded_engine(
        Recipient::new(1, "Mara", Some(30)),
        vec![
            Recipient::new(2, "Theo", Some(14)),
            Recipient::new(3, "Ash", None),
        ],
    )?;
    let mut current = PurchaseRequest::for_game(GameRef::new(9, "Dread Manor").with_min_age(18));
    current.selected_recipient_ids = vec![1];

    ensure!(
        engine.toggle_recipient(&current, 2, true).is_none(),
        "underage friend was selected"
    );
    ensure!(
        engine.disclaimer()
            == Some(EligibilityDisclaimer {
                recipient_id: 2,
                reason: DisclaimerReason::BelowMinimumAge,
            }),
        "unexpected disclaimer {:?}",
        engine.disclaimer()
    );
    ensure!(
        engine.toggle_recipient(&current, 3, true).is_none(),
        "friend of unknown age was selected"
    );
    ensure!(
        engine.disclaimer()
            == Some(EligibilityDisclaimer {
                recipient_id: 3,
                reason: DisclaimerReason::AgeUnknown,
            }),
        "disclaimer was not replaced: {:?}",
        engine.disclaimer()
    );
    ensure!(engine.disclaimer_for(2).is_none(), "two disclaimers shown");
    Ok(())
}

fn invite_panel_reset() -> Result<()> {
    let mut engine = RecipientSelectionEngine::new();
    let rated = PurchaseRequest::for_game(GameRef::new(9, "Dread Manor").with_min_age(18));
    let current = invite(&invite(&rated, 0, "ana@example.com")?, 1, "bo@example.com")?
        .with_acknowledgement(AcknowledgementFlag::Invite, true)
        .with_acknowledgement(AcknowledgementFlag::InviteAge, true);

    ensure!(
        engine.toggle_invite_panel(&current, true).is_none(),
        "opening the panel emitted a snapshot"
    );
    ensure!(engine.is_invite_panel_open(), "panel did not open");
    let closed = engine
        .toggle_invite_panel(&current, false)
        .context("closing the panel emitted nothing")?;
    ensure!(closed.invite_emails.is_empty(), "emails kept: {:?}", closed.invite_emails);
    ensure!(
        !closed.acknowledge_invite && !closed.acknowledge_invite_age,
        "acknowledgements kept"
    );
    ensure!(!engine.is_invite_panel_open(), "panel still open");
    Ok(())
}

fn sparse_email_slots() -> Result<()> {
    let mut engine = RecipientSelectionEngine::new();
    let unrated = PurchaseRequest::for_game(GameRef::new(9, "Kart Party"));
    let current = invite(&unrated, 0, "ana@example.com")?;
    let next = engine
        .dispatch(
            &current,
            FormAction::SetInviteEmail {
                index: 2,
                value: "cy@example.com".into(),
            },
        )
        .context("email edit emitted nothing")?;
    ensure!(
        next.invite_emails == vec!["ana@example.com", "", "cy@example.com"],
        "got {:?}",
        next.invite_emails
    );
    let overflow = FormAction::SetInviteEmail {
        index: usize::MAX,
        value: "dee@example.com".into(),
    };
    ensure!(
        engine.dispatch(&next, overflow).is_none(),
        "out-of-range slot was written"
    );
    Ok(())
}

fn restricted_game() -> Result<()> {
    let mut engine = seeded_engine(
        Recipient::new(1, "Me", Some(25)),
        vec![Recipient::new(2, "A", Some(17))],
    )?;
    let current = PurchaseRequest::for_game(GameRef::new(9, "Dread Manor").with_min_age(21));

    let with_me = engine
        .toggle_recipient(&current, 1, true)
        .context("selecting self emitted nothing")?;
    ensure!(with_me.selected_recipient_ids == vec![1], "got {:?}", with_me.selected_recipient_ids);
    ensure!(
        engine.toggle_recipient(&with_me, 2, true).is_none(),
        "17 year old selected for a 21+ game"
    );
    ensure!(
        engine.disclaimer()
            == Some(EligibilityDisclaimer {
                recipient_id: 2,
                reason: DisclaimerReason::BelowMinimumAge,
            }),
        "unexpected disclaimer {:?}",
        engine.disclaimer()
    );
    Ok(())
}

fn unrestricted_game() -> Result<()> {
    let mut engine = seeded_engine(
        Recipient::new(1, "Me", Some(25)),
        vec![Recipient::new(2, "B", None), Recipient::new(3, "C", None)],
    )?;
    let current = PurchaseRequest::for_game(GameRef::new(9, "Kart Party"));

    let with_b = engine
        .toggle_recipient(&current, 2, true)
        .context("selecting B emitted nothing")?;
    let with_c = engine
        .toggle_recipient(&with_b, 3, true)
        .context("selecting C emitted nothing")?;
    ensure!(with_c.selected_recipient_ids == vec![2, 3], "got {:?}", with_c.selected_recipient_ids);
    ensure!(engine.disclaimer().is_none(), "unexpected disclaimer");
    Ok(())
}

fn stale_fetch() -> Result<()> {
    let mut engine = RecipientSelectionEngine::new();
    let first = engine
        .begin_fetch(Some(Recipient::new(1, "Mara", Some(30))))
        .context("first fetch not started")?;
    let second = engine
        .begin_fetch(Some(Recipient::new(7, "Noor", Some(27))))
        .context("second fetch not started")?;

    let newest = engine.resolve_fetch(FetchResolution::new(
        second,
        Ok::<_, Infallible>(vec![Recipient::new(8, "Ike", None)]),
    ));
    ensure!(newest == FetchOutcome::Applied(2), "got {newest:?}");
    let late = engine.resolve_fetch(FetchResolution::new(
        first,
        Ok::<_, Infallible>(vec![Recipient::new(2, "Theo", Some(14))]),
    ));
    ensure!(late == FetchOutcome::Stale, "late resolution applied: {late:?}");
    ensure!(engine.roster().me() == Some(7), "roster replaced by stale fetch");
    Ok(())
}

fn roster_order() -> Result<()> {
    let roster = RecipientRoster::assemble(
        Recipient::new(1, "mara", Some(30)),
        vec![
            Recipient::new(4, "Zed", None),
            Recipient::new(2, "ash", Some(20)),
            Recipient::new(1, "Mara Duplicate", Some(30)),
            Recipient::new(3, "Beth", Some(12)),
        ],
        &CaseFoldCollator,
    );
    let ids: Vec<_> = roster.entries().iter().map(|r| r.id).collect();
    ensure!(ids == vec![2, 3, 1, 4], "got {ids:?}");
    ensure!(
        roster.get(1).map(|r| r.name.as_str()) == Some("mara"),
        "self entry was replaced by a duplicate"
    );
    Ok(())
}

fn purchase_validation() -> Result<()> {
    let unrated = PurchaseRequest::for_game(GameRef::new(9, "Kart Party"));
    let rated = PurchaseRequest::for_game(GameRef::new(9, "Dread Manor").with_min_age(18));

    ensure!(
        validate_purchase(&unrated) == Err(PurchaseValidationError::NoRecipients),
        "empty request accepted"
    );
    let mut selected = unrated.clone();
    selected.selected_recipient_ids = vec![1];
    ensure!(validate_purchase(&selected).is_ok(), "selected recipient rejected");

    let bad_email = invite(&unrated, 0, "not-an-email")?
        .with_acknowledgement(AcknowledgementFlag::Invite, true);
    ensure!(
        matches!(
            validate_purchase(&bad_email),
            Err(PurchaseValidationError::InvalidEmail { index: 0, .. })
        ),
        "malformed email accepted"
    );
    let unacknowledged = invite(&unrated, 0, "ana@example.com")?;
    ensure!(
        validate_purchase(&unacknowledged) == Err(PurchaseValidationError::InviteNotAcknowledged),
        "invite without acknowledgement accepted"
    );
    let no_age_ack = invite(&rated, 0, "ana@example.com")?
        .with_acknowledgement(AcknowledgementFlag::Invite, true);
    ensure!(
        validate_purchase(&no_age_ack) == Err(PurchaseValidationError::InviteAgeNotAcknowledged),
        "rated invite without age acknowledgement accepted"
    );
    Ok(())
}
