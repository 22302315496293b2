//! End-to-end scenarios exercising the full workspace through the umbrella
//! crate's public surface: a caller builds a `Presentation`, hands it to one
//! or more engines, and drives them directly or through a `Race`.

use fpsemi::{
    FpSemiError, KnuthBendix, KnuthBendixConfig, Presentation, Race, Runner, Shortlex, StopReason,
    ToddCoxeter, ToddCoxeterConfig, Word,
};
use std::sync::Arc;
use std::time::Duration;

fn w(s: &str) -> Word {
    Word::from_default_str(s).unwrap()
}

/// Commutative pair: `ba = ab`. Shortlex orients it `ba -> ab`.
fn free_commutative_pair() -> Presentation {
    Presentation::with_alphabet_string("ab", vec![(w("ba"), w("ab"))], Arc::new(Shortlex)).unwrap()
}

#[test]
fn scenario_1_knuth_bendix_on_a_commutative_pair() {
    let mut kb = KnuthBendix::new(free_commutative_pair(), KnuthBendixConfig::default()).unwrap();
    kb.run().unwrap();
    assert!(kb.confluent());
    assert_eq!(kb.normal_form(&w("bbaa")).to_string(2), "aabb");
    assert!(kb.equal_to(&w("abab"), &w("aabb")));
}

/// `a^2 = 1, b^2 = 1, (ab)^2 = 1` — the Klein four-group.
fn klein_four_presentation() -> Presentation {
    Presentation::with_alphabet_string(
        "ab",
        vec![
            (w("aa"), Word::empty()),
            (w("bb"), Word::empty()),
            (w("abab"), Word::empty()),
        ],
        Arc::new(Shortlex),
    )
    .unwrap()
}

#[test]
fn scenario_2_todd_coxeter_on_the_klein_four_group() {
    let mut tc = ToddCoxeter::new(klein_four_presentation(), vec![], ToddCoxeterConfig::default())
        .unwrap();
    tc.run().unwrap();
    assert!(tc.finished());
    assert_eq!(tc.size().unwrap(), 4);
    let graph = tc.word_graph();
    assert_eq!(graph.len(), tc.size().unwrap() * 2);
    assert!(tc.equal_to(&w("ab"), &w("ba")).unwrap());
}

/// The A3 Coxeter presentation of S4: three involutions `a, b, c` with braid
/// relations `(ab)^3 = (bc)^3 = 1` and the commuting pair `(ac)^2 = 1`.
fn symmetric_group_s4_presentation() -> Presentation {
    Presentation::with_alphabet_string(
        "abc",
        vec![
            (w("aa"), Word::empty()),
            (w("bb"), Word::empty()),
            (w("cc"), Word::empty()),
            (w("ababab"), Word::empty()),
            (w("bcbcbc"), Word::empty()),
            (w("acac"), Word::empty()),
        ],
        Arc::new(Shortlex),
    )
    .unwrap()
}

#[test]
fn scenario_3_todd_coxeter_on_s4_via_its_coxeter_presentation() {
    let mut tc = ToddCoxeter::new(
        symmetric_group_s4_presentation(),
        vec![],
        ToddCoxeterConfig::default(),
    )
    .unwrap();
    tc.run().unwrap();
    assert!(tc.finished());
    assert_eq!(tc.size().unwrap(), 24);
}

/// The bicyclic monoid: `b * a = 1` reduces any `ba` subword to the empty
/// word; this single rule has no self-overlaps, so it is already a complete
/// rewriting system for an infinite monoid — KB finishes immediately even
/// though the monoid itself has no finite size.
fn bicyclic_monoid_presentation() -> Presentation {
    Presentation::with_alphabet_string("ab", vec![(w("ba"), Word::empty())], Arc::new(Shortlex))
        .unwrap()
}

#[test]
fn scenario_4_knuth_bendix_completes_instantly_on_the_bicyclic_monoid() {
    let mut kb =
        KnuthBendix::new(bicyclic_monoid_presentation(), KnuthBendixConfig::default()).unwrap();
    kb.run_for(Duration::from_millis(10)).unwrap();
    assert!(kb.finished());
    assert!(kb.confluent());
    assert_eq!(kb.normal_form(&w("bab")).to_string(2), "b");
}

/// A presentation known to make plain shortlex Knuth-Bendix completion run
/// forever: `a^2 = a, b^2 = b, abab = ba` (Sims, *Computations with Finitely
/// Presented Groups*, the standard textbook example of non-terminating
/// completion).
fn never_terminating_presentation() -> Presentation {
    Presentation::with_alphabet_string(
        "ab",
        vec![
            (w("aa"), w("a")),
            (w("bb"), w("b")),
            (w("abab"), w("ba")),
        ],
        Arc::new(Shortlex),
    )
    .unwrap()
}

#[test]
fn scenario_4b_knuth_bendix_times_out_on_a_non_terminating_completion() {
    let mut kb =
        KnuthBendix::new(never_terminating_presentation(), KnuthBendixConfig::default()).unwrap();
    kb.run_for(Duration::from_millis(10)).unwrap();
    assert!(kb.timed_out());
    // `aa -> a` is one of the original defining relations, active from
    // construction onward regardless of how completion has otherwise
    // progressed.
    assert_eq!(kb.normal_form(&w("aa")).to_string(2), "a");
}

/// PSL(2,7), the smallest Hurwitz group, presented as the (2,3,7) triangle
/// group quotient `<x, y | x^2 = y^3 = (xy)^7 = [x,y]^4 = 1>`. Rendered as a
/// pure monoid presentation by giving the order-3 generator `b` an explicit
/// inverse letter `c` (`a` is self-inverse, so it needs none): `aa = 1`,
/// `bc = 1`, `cb = 1`, `bbb = 1`, `(ab)^7 = 1`, `(abac)^4 = 1` (`c` stands in
/// for `b`'s inverse in the commutator relator).
fn psl_2_7_presentation() -> Presentation {
    Presentation::with_alphabet_string(
        "abc",
        vec![
            (w("aa"), Word::empty()),
            (w("bc"), Word::empty()),
            (w("cb"), Word::empty()),
            (w("bbb"), Word::empty()),
            (w("abababababababab"), Word::empty()),
            (w("abacabacabacabac"), Word::empty()),
        ],
        Arc::new(Shortlex),
    )
    .unwrap()
}

#[test]
fn scenario_5_a_race_between_knuth_bendix_and_todd_coxeter_on_psl_2_7() {
    let mut race = Race::new();
    race.add_runner(Box::new(
        KnuthBendix::new(psl_2_7_presentation(), KnuthBendixConfig::default()).unwrap(),
    ));
    race.add_runner(Box::new(
        ToddCoxeter::new(psl_2_7_presentation(), vec![], ToddCoxeterConfig::default()).unwrap(),
    ));

    race.run_for(Duration::from_millis(500)).unwrap();

    let winner = race.winner().unwrap();
    assert!(winner.finished());
    let tc = winner
        .as_any()
        .downcast_ref::<ToddCoxeter>()
        .expect("the Todd-Coxeter engine should win this race");
    assert_eq!(tc.size().unwrap(), 168);
}

#[test]
fn scenario_6_killing_a_knuth_bendix_engine_from_another_thread() {
    let mut kb =
        KnuthBendix::new(never_terminating_presentation(), KnuthBendixConfig::default()).unwrap();
    let kill_handle = kb.kill_handle();

    let killer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(5));
        kill_handle.kill();
    });

    kb.run().unwrap();
    killer.join().unwrap();

    assert!(kb.dead());
    assert_eq!(
        kb.run(),
        Err(FpSemiError::Cancelled {
            reason: StopReason::Killed
        })
    );
}
