#[cfg(test)]
mod tests {
    use crate::enforce::run_via_monitor;
    use crate::domain::Snapshot;
    use crate::monitor::MonitorInstance;
    use crate::policy::Policy;
    use crate::verdict::Verdict;

    /// A well-behaved controller: delays the input by one tick, like the
    /// policy demands. Keeps its own previous value, no shared state.
    fn compliant_step(prev: &mut bool) -> impl FnOnce(&mut Snapshot) + '_ {
        move |snapshot| {
            if let Snapshot::Logic { a, b } = snapshot {
                *b = *prev;
                *prev = *a;
            }
        }
    }

    #[test]
    fn output_is_input_delayed_by_one_tick() {
        let inputs = [false, false, true, false, false, false, true, false];
        let mut instance = MonitorInstance::init(&Policy::latch()).unwrap();
        let mut snapshot = Snapshot::logic();
        let mut prev = false;

        for (n, &a) in inputs.iter().enumerate() {
            if let Snapshot::Logic { a: input, .. } = &mut snapshot {
                *input = a;
            }
            let verdict =
                run_via_monitor(compliant_step(&mut prev), &mut instance, &mut snapshot).unwrap();
            assert_eq!(verdict, Verdict::CurrentlyTrue);

            let expected = if n == 0 { false } else { inputs[n - 1] };
            assert_eq!(snapshot, Snapshot::Logic { a, b: expected });
        }
    }

    #[test]
    fn first_tick_uses_declared_default() {
        // the nominal step gets the output wrong on tick one; enforcement
        // must force the declared default (false)
        let mut instance = MonitorInstance::init(&Policy::latch()).unwrap();
        let mut snapshot = Snapshot::Logic { a: true, b: false };
        let verdict = run_via_monitor(
            |s| {
                if let Snapshot::Logic { b, .. } = s {
                    *b = true;
                }
            },
            &mut instance,
            &mut snapshot,
        )
        .unwrap();
        assert_eq!(verdict, Verdict::CurrentlyFalse);
        assert_eq!(snapshot, Snapshot::Logic { a: true, b: false });
    }

    #[test]
    fn enforcement_corrects_a_faulty_controller() {
        // controller stuck at b = true, whatever the history
        let inputs = [false, true, true, false, true, false, false];
        let mut instance = MonitorInstance::init(&Policy::latch()).unwrap();

        for (n, &a) in inputs.iter().enumerate() {
            let mut snapshot = Snapshot::Logic { a, b: false };
            let verdict = run_via_monitor(
                |s| {
                    if let Snapshot::Logic { b, .. } = s {
                        *b = true;
                    }
                },
                &mut instance,
                &mut snapshot,
            )
            .unwrap();

            let expected = if n == 0 { false } else { inputs[n - 1] };
            // corrected output always equals the policy's required value
            assert_eq!(snapshot, Snapshot::Logic { a, b: expected });
            // the verdict still exposes whether this tick was corrected
            if expected {
                assert_eq!(verdict, Verdict::CurrentlyTrue);
            } else {
                assert_eq!(verdict, Verdict::CurrentlyFalse);
            }
            assert_eq!(instance.query(), verdict);
        }
    }

    #[test]
    fn random_streams_stay_delayed_under_enforcement() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0xB5);
        let mut instance = MonitorInstance::init(&Policy::latch()).unwrap();
        let mut previous_input = false;

        for _ in 0..500 {
            let a = rng.gen_bool(0.5);
            let noise = rng.gen_bool(0.5);
            let mut snapshot = Snapshot::Logic { a, b: false };
            run_via_monitor(
                |s| {
                    if let Snapshot::Logic { b, .. } = s {
                        *b = noise;
                    }
                },
                &mut instance,
                &mut snapshot,
            )
            .unwrap();
            assert_eq!(snapshot, Snapshot::Logic { a, b: previous_input });
            previous_input = a;
        }
    }

    #[test]
    fn independent_instances_do_not_alias_history() {
        let mut one = MonitorInstance::init(&Policy::latch()).unwrap();
        let mut two = MonitorInstance::init(&Policy::latch().named("latch-2").unwrap()).unwrap();

        // drive only the first instance; the second must keep its default
        one.advance(&Snapshot::Logic { a: true, b: false }).unwrap();
        let v1 = one.advance(&Snapshot::Logic { a: false, b: true }).unwrap();
        assert_eq!(v1, Verdict::CurrentlyTrue);

        // if history were shared, b = true would now be accepted here too
        let v2 = two.advance(&Snapshot::Logic { a: false, b: true }).unwrap();
        assert_eq!(v2, Verdict::CurrentlyFalse);
    }
}
