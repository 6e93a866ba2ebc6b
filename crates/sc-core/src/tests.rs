//! Unit tests for sc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EventId, RobotId, SlotId, StationId};

    #[test]
    fn index_roundtrip() {
        let id = RobotId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(RobotId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(RobotId::INVALID.0, u32::MAX);
        assert_eq!(SlotId::INVALID.0, u32::MAX);
        assert_eq!(EventId::INVALID.0, u64::MAX);
        assert_eq!(StationId::default(), StationId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(RobotId(7).to_string(), "RobotId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Direction, Position};

    #[test]
    fn turn_counts() {
        assert_eq!(Direction::Up.turn_count(Direction::Up), 0);
        assert_eq!(Direction::Up.turn_count(Direction::Left), 1);
        assert_eq!(Direction::Up.turn_count(Direction::Down), 2);
        assert_eq!(Direction::Up.turn_count(Direction::Right), 1);
        assert_eq!(Direction::Right.turn_count(Direction::Up), 1);
        assert_eq!(Direction::Left.turn_count(Direction::Right), 2);
    }

    #[test]
    fn inverse_is_an_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.inverse().inverse(), dir);
            assert_eq!(dir.turn_count(dir.inverse()), 2);
        }
        assert_eq!(Direction::Left.inverse(), Direction::Right);
    }

    #[test]
    fn next_on_steps_one_cell() {
        let p = Position::new(2, 3);
        assert_eq!(p.next_on(Direction::Up), Position::new(1, 3));
        assert_eq!(p.next_on(Direction::Left), Position::new(2, 2));
        assert_eq!(p.next_on(Direction::Down), Position::new(3, 3));
        assert_eq!(p.next_on(Direction::Right), Position::new(2, 4));
        for dir in Direction::ALL {
            assert_eq!(p.next_on(dir).next_on(dir.inverse()), p);
        }
    }

    #[test]
    fn manhattan() {
        assert_eq!(Position::new(0, 0).manhattan(Position::new(2, -3)), 5);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimConfig, SimTime};

    #[test]
    fn arithmetic() {
        let t = SimTime(1.5);
        assert_eq!(t + 2.0, SimTime(3.5));
        assert_eq!(SimTime(4.0) - t, 2.5);
        assert_eq!(t - 0.5, SimTime(1.0));
    }

    #[test]
    fn total_order_with_infinity() {
        assert!(SimTime::ZERO < SimTime(0.1));
        assert!(SimTime(1e300) < SimTime::INFINITY);
        assert_eq!(SimTime::INFINITY + 1.0, SimTime::INFINITY);
        assert_eq!(SimTime(3.0).max(SimTime(2.0)), SimTime(3.0));
        assert_eq!(SimTime::INFINITY.min(SimTime(2.0)), SimTime(2.0));
    }

    #[test]
    fn usable_as_btree_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(SimTime(2.0), 'b');
        map.insert(SimTime(1.0), 'a');
        map.insert(SimTime::INFINITY, 'z');
        let keys: Vec<char> = map.values().copied().collect();
        assert_eq!(keys, vec!['a', 'b', 'z']);
    }

    #[test]
    fn config_defaults() {
        let cfg = SimConfig::new(42, 100.0);
        assert_eq!(cfg.end_time, SimTime(100.0));
        assert_eq!(SimConfig::default().seed, 0);
    }
}

#[cfg(test)]
mod robot {
    use crate::{Action, Direction, RobotType};

    #[test]
    fn action_durations() {
        let kind = RobotType::new(1.0, 0.5, 2.0, 3.0);
        assert_eq!(Action::Move.duration(&kind, Direction::Up), 1.0);
        assert_eq!(Action::Turn(Direction::Down).duration(&kind, Direction::Up), 1.0);
        assert_eq!(Action::Turn(Direction::Left).duration(&kind, Direction::Up), 0.5);
        assert_eq!(Action::Put.duration(&kind, Direction::Up), 2.0);
        assert_eq!(Action::Take.duration(&kind, Direction::Up), 3.0);
        assert_eq!(Action::Idle.duration(&kind, Direction::Up), 0.0);
    }

    #[test]
    fn display() {
        assert_eq!(Action::Turn(Direction::Left).to_string(), "turn_to_left");
        assert_eq!(Action::Take.to_string(), "take");
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: u64 = r1.random();
            let b: u64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn choose_handles_empty() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert!(rng.choose(&[1, 2, 3]).is_some());
    }

    #[test]
    fn children_diverge() {
        let mut root = SimRng::new(1);
        let mut a = root.child(0);
        let mut b = root.child(1);
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_ne!(x, y);
    }
}

#[cfg(test)]
mod parsing {
    use crate::{Direction, ScError, SimConfig};

    #[test]
    fn directions_parse_from_their_names() {
        for dir in Direction::ALL {
            assert_eq!(dir.as_str().parse::<Direction>().unwrap(), dir);
        }
        assert!(matches!("north".parse::<Direction>(), Err(ScError::Parse(_))));
    }

    #[test]
    fn config_end_time_is_checked() {
        assert!(SimConfig::new(1, 10.0).validate().is_ok());
        assert!(matches!(SimConfig::new(1, -1.0).validate(), Err(ScError::Config(_))));
        assert!(SimConfig::new(1, f64::INFINITY).validate().is_err());
    }
}
