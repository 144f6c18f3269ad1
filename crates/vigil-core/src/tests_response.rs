#[cfg(test)]
mod tests {
    use crate::domain::Snapshot;
    use crate::monitor::MonitorInstance;
    use crate::policy::Policy;
    use crate::verdict::Verdict;

    fn response_instance() -> MonitorInstance {
        MonitorInstance::init(&Policy::bounded_response(5).unwrap()).unwrap()
    }

    fn advance(instance: &mut MonitorInstance, a: bool, b: bool) -> Verdict {
        instance.advance(&Snapshot::Logic { a, b }).unwrap()
    }

    #[test]
    fn answered_request_returns_to_compliance() {
        let mut m = response_instance();
        assert_eq!(advance(&mut m, false, false), Verdict::CurrentlyTrue);
        assert_eq!(advance(&mut m, true, false), Verdict::CurrentlyFalse);
        assert_eq!(advance(&mut m, false, false), Verdict::CurrentlyFalse);
        assert_eq!(advance(&mut m, false, true), Verdict::CurrentlyTrue);
        assert_eq!(advance(&mut m, false, false), Verdict::CurrentlyTrue);
    }

    #[test]
    fn missed_deadline_settles_permanently_false() {
        let mut m = response_instance();
        advance(&mut m, true, false);
        // four quiet ticks are still within the deadline
        for _ in 0..4 {
            assert_eq!(advance(&mut m, false, false), Verdict::CurrentlyFalse);
        }
        // the fifth quiet tick exceeds it
        assert_eq!(advance(&mut m, false, false), Verdict::PermanentlyFalse);
        // no late answer can recover a permanent verdict
        assert_eq!(advance(&mut m, false, true), Verdict::PermanentlyFalse);
    }

    #[test]
    fn spurious_answer_is_a_violation() {
        let mut m = response_instance();
        assert_eq!(advance(&mut m, false, true), Verdict::PermanentlyFalse);
    }

    #[test]
    fn doubled_request_is_a_violation() {
        let mut m = response_instance();
        advance(&mut m, true, false);
        assert_eq!(advance(&mut m, true, false), Verdict::PermanentlyFalse);
    }

    #[test]
    fn simultaneous_request_and_answer_settles_permanently_true() {
        let mut m = response_instance();
        assert_eq!(advance(&mut m, true, true), Verdict::PermanentlyTrue);
        // trap: later noise cannot unsettle it
        assert_eq!(advance(&mut m, false, true), Verdict::PermanentlyTrue);
        assert_eq!(advance(&mut m, true, false), Verdict::PermanentlyTrue);
    }
}
