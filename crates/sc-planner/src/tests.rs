//! Unit tests for sc-planner.
//!
//! Each test drives `PathBrain` directly with hand-made robot views, the way
//! the execution loop would, and inspects the committed timelines.

#[cfg(test)]
mod helpers {
    use sc_behavior::{BrainContext, RobotView};
    use sc_core::{Direction, Mail, MailId, Position, RobotId, RobotType, SimTime, StationId};
    use sc_spatial::{Grid, GridBuilder};

    pub fn p(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    pub fn at(t: f64, grid: &Grid) -> BrainContext<'_> {
        BrainContext::new(SimTime(t), grid)
    }

    pub fn view(id: u32, position: Position, direction: Direction, mail: Option<Mail>) -> RobotView {
        RobotView {
            id: RobotId(id),
            position,
            direction,
            mail,
            kind: RobotType::new(1.0, 1.0, 1.0, 1.0),
            timed_out: false,
        }
    }

    pub fn mail_for(station: u32) -> Option<Mail> {
        Some(Mail::new(MailId(1), StationId(station)))
    }

    /// 1×4 corridor: input 1 at (0,0), output 1 at (0,3).
    pub fn corridor() -> Grid {
        GridBuilder::new(1, 4)
            .input(p(0, 0), StationId(1))
            .output(p(0, 3), StationId(1))
            .build()
            .unwrap()
    }

    /// Open 3×3 grid with outputs east (1,2) and south (2,1) of the centre.
    pub fn crossing() -> Grid {
        GridBuilder::new(3, 3)
            .input(p(0, 0), StationId(1))
            .output(p(1, 2), StationId(1))
            .output(p(2, 1), StationId(2))
            .build()
            .unwrap()
    }
}

// ── Corridor ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod corridor {
    use sc_behavior::{Brain, Decision};
    use sc_core::{Action, Direction, RobotId, SimTime};
    use sc_spatial::Reservation;

    use super::helpers::{at, corridor, mail_for, p, view};
    use crate::{PathBrain, PlannerConfig};

    fn r(a: f64, b: f64, c: f64, d: f64) -> Reservation {
        Reservation::new(SimTime(a), SimTime(b), SimTime(c), SimTime(d))
    }

    #[test]
    fn robot_on_input_takes_immediately() {
        let grid = corridor();
        let mut brain = PathBrain::new(&grid, PlannerConfig::default()).unwrap();
        let robot = view(1, p(0, 0), Direction::Right, None);
        brain.new_robot(&robot, &at(0.0, &grid)).unwrap();

        let d = brain.next_action(&robot, &at(0.0, &grid)).unwrap();
        assert_eq!(d, Decision::act(Action::Take));
        assert_eq!(brain.store().reservations(p(0, 0)).unwrap(), vec![Reservation::open_ended(SimTime(0.0), SimTime(0.0))]);
    }

    #[test]
    fn route_to_output_reserves_each_cell() {
        let grid = corridor();
        let mut brain = PathBrain::new(&grid, PlannerConfig::default()).unwrap();
        brain.new_robot(&view(1, p(0, 0), Direction::Right, None), &at(0.0, &grid)).unwrap();
        brain.next_action(&view(1, p(0, 0), Direction::Right, None), &at(0.0, &grid)).unwrap();

        let loaded = view(1, p(0, 0), Direction::Right, mail_for(1));
        assert_eq!(brain.next_action(&loaded, &at(1.0, &grid)).unwrap(), Decision::act(Action::Move));
        assert_eq!(brain.target(RobotId(1)), Some(p(0, 3)));

        let store = brain.store();
        assert_eq!(store.reservations(p(0, 0)).unwrap(), vec![r(0.0, 0.0, 1.0, 2.0)]);
        assert_eq!(store.reservations(p(0, 1)).unwrap(), vec![r(1.0, 2.0, 2.0, 3.0)]);
        assert_eq!(store.reservations(p(0, 2)).unwrap(), vec![r(2.0, 3.0, 3.0, 4.0)]);
        assert_eq!(
            store.reservations(p(0, 3)).unwrap(),
            vec![Reservation::open_ended(SimTime(3.0), SimTime(4.0))]
        );
        assert_eq!(brain.planned_path(RobotId(1)).unwrap().len(), 2);
    }

    #[test]
    fn walk_releases_trailing_cells_and_puts() {
        let grid = corridor();
        let mut brain = PathBrain::new(&grid, PlannerConfig::default()).unwrap();
        brain.new_robot(&view(1, p(0, 0), Direction::Right, None), &at(0.0, &grid)).unwrap();
        brain.next_action(&view(1, p(0, 0), Direction::Right, None), &at(0.0, &grid)).unwrap();
        brain.next_action(&view(1, p(0, 0), Direction::Right, mail_for(1)), &at(1.0, &grid)).unwrap();

        let d = brain.next_action(&view(1, p(0, 1), Direction::Right, mail_for(1)), &at(2.0, &grid)).unwrap();
        assert_eq!(d, Decision::act(Action::Move));
        assert!(brain.store().reservations(p(0, 0)).unwrap().is_empty());

        brain.next_action(&view(1, p(0, 2), Direction::Right, mail_for(1)), &at(3.0, &grid)).unwrap();
        let d = brain.next_action(&view(1, p(0, 3), Direction::Right, mail_for(1)), &at(4.0, &grid)).unwrap();
        assert_eq!(d, Decision::act(Action::Put));
        assert_eq!(brain.target(RobotId(1)), None);
        assert_eq!(brain.store().reservation_count(), 1);
    }

    #[test]
    fn unreachable_output_leaves_timelines_untouched() {
        let grid = sc_spatial::GridBuilder::new(1, 3)
            .wall(p(0, 1))
            .input(p(0, 0), sc_core::StationId(1))
            .output(p(0, 2), sc_core::StationId(1))
            .build()
            .unwrap();
        let mut brain = PathBrain::new(&grid, PlannerConfig::default()).unwrap();
        let robot = view(1, p(0, 0), Direction::Right, mail_for(1));
        brain.new_robot(&robot, &at(0.0, &grid)).unwrap();
        let before = brain.store().reservations(p(0, 0)).unwrap();

        let err = brain.next_action(&robot, &at(0.0, &grid)).unwrap_err();
        assert!(matches!(err, sc_behavior::BrainError::UnreachablePath { to, .. } if to == p(0, 2)));
        assert_eq!(brain.store().reservations(p(0, 0)).unwrap(), before);
        assert_eq!(brain.store().reservation_count(), 1);
        assert!(brain.store().audit().is_ok());
    }

    #[test]
    fn turning_in_place_hands_the_cell_to_the_next_claim() {
        let grid = corridor();
        let mut brain = PathBrain::new(&grid, PlannerConfig::default()).unwrap();
        let robot = view(1, p(0, 1), Direction::Right, None);
        brain.new_robot(&robot, &at(0.0, &grid)).unwrap();

        let d = brain.next_action(&robot, &at(0.0, &grid)).unwrap();
        assert!(matches!(d.action, Action::Turn(_)));
        assert!(brain.store().audit().is_ok());

        let home = brain.store().reservations(p(0, 1)).unwrap();
        assert!(home.len() >= 2);
        for pair in home.windows(2) {
            assert!(pair[0].reserve_until <= pair[1].reserve_from);
            assert!(pair[0].be_until <= pair[1].be_from);
        }
        assert_eq!(home.last().unwrap().reserve_until, SimTime(3.0));
        assert_eq!(
            brain.store().reservations(p(0, 0)).unwrap(),
            vec![Reservation::open_ended(SimTime(2.0), SimTime(3.0))]
        );
    }
}

// ── Several robots ────────────────────────────────────────────────────────────

#[cfg(test)]
mod crossing {
    use sc_behavior::{Brain, Decision};
    use sc_core::{Action, Direction, RobotId, SimTime};
    use sc_spatial::Reservation;

    use super::helpers::{at, crossing, mail_for, p, view};
    use crate::{PathBrain, PlannerConfig};

    /// A heads east to output 1, B heads south to output 2; both paths cross
    /// the centre cell.
    fn planned() -> (sc_spatial::Grid, PathBrain) {
        let grid = crossing();
        let mut brain = PathBrain::new(&grid, PlannerConfig::default()).unwrap();
        let a = view(1, p(1, 0), Direction::Right, mail_for(1));
        let b = view(2, p(0, 1), Direction::Down, mail_for(2));
        brain.new_robot(&a, &at(0.0, &grid)).unwrap();
        brain.new_robot(&b, &at(0.0, &grid)).unwrap();
        assert_eq!(brain.next_action(&a, &at(0.0, &grid)).unwrap(), Decision::act(Action::Move));
        (grid, brain)
    }

    #[test]
    fn second_robot_waits_for_the_centre() {
        let (grid, mut brain) = planned();
        let b = view(2, p(0, 1), Direction::Down, mail_for(2));
        assert_eq!(brain.next_action(&b, &at(0.0, &grid)).unwrap(), Decision::idle_until(SimTime(2.0)));

        let centre = brain.store().reservations(p(1, 1)).unwrap();
        assert_eq!(centre.len(), 2);
        assert!(centre[0].reserve_until <= centre[1].reserve_from);
        assert_eq!(brain.planned_path(RobotId(2)).unwrap().last().unwrap().end, SimTime(4.0));
        assert!(brain.store().audit().is_ok());
    }

    #[test]
    fn late_robot_replans_from_now() {
        let (grid, mut brain) = planned();
        let b = view(2, p(0, 1), Direction::Down, mail_for(2));
        brain.next_action(&b, &at(0.0, &grid)).unwrap();

        assert_eq!(brain.next_action(&b, &at(3.0, &grid)).unwrap(), Decision::act(Action::Move));
        let centre = brain.store().reservations(p(1, 1)).unwrap();
        assert_eq!(centre.last().unwrap().reserve_from, SimTime(3.0));
        assert!(brain.store().audit().is_ok());
    }

    #[test]
    fn timed_out_move_steps_back_and_replans() {
        let (grid, mut brain) = planned();
        let b = view(2, p(0, 1), Direction::Down, mail_for(2));
        brain.next_action(&b, &at(0.0, &grid)).unwrap();
        assert_eq!(brain.next_action(&b, &at(2.0, &grid)).unwrap(), Decision::act(Action::Move));

        // the move never happened: B is still north of the centre
        let stuck = sc_behavior::RobotView { timed_out: true, ..b };
        assert_eq!(brain.next_action(&stuck, &at(2.5, &grid)).unwrap(), Decision::act(Action::Move));
        let left = Reservation::new(SimTime(0.0), SimTime(0.0), SimTime(2.5), SimTime(3.5));
        assert_eq!(brain.store().reservations(p(0, 1)).unwrap(), vec![left]);
        let current = brain.current_slot(RobotId(2)).unwrap();
        assert_eq!(brain.store().position(current).unwrap(), p(1, 1));
        assert!(brain.store().audit().is_ok());
    }
}

// ── Rest policies ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod rests {
    use std::collections::HashMap;

    use sc_behavior::{Brain, BrainError};
    use sc_core::{Direction, RobotId, SimTime};

    use super::helpers::{at, corridor, mail_for, p, view};
    use crate::{PathBrain, PlannerConfig, RestPolicy};

    fn route_with(rests: RestPolicy) -> PathBrain {
        let grid = corridor();
        let mut brain = PathBrain::new(&grid, PlannerConfig::default().with_rests(rests)).unwrap();
        brain.new_robot(&view(1, p(0, 0), Direction::Right, None), &at(0.0, &grid)).unwrap();
        brain.next_action(&view(1, p(0, 0), Direction::Right, mail_for(1)), &at(1.0, &grid)).unwrap();
        brain
    }

    #[test]
    fn closest_rest_parks_on_the_earliest_cell() {
        let brain = route_with(RestPolicy::Closest(vec![p(0, 0), p(0, 2)]));
        let path = brain.planned_path(RobotId(1)).unwrap();
        let last = path.last().unwrap();
        assert_eq!(last.to.position, p(0, 2));
        assert_eq!(last.end, SimTime(8.0));
        let parked = brain.store().reservations(p(0, 2)).unwrap();
        assert_eq!(parked.last().unwrap().reserve_until, SimTime::INFINITY);
        assert!(brain.store().audit().is_ok());
    }

    #[test]
    fn personal_rest_is_visited_after_the_station() {
        let rests = HashMap::from([(RobotId(1), p(0, 1))]);
        let brain = route_with(RestPolicy::Personal(rests));
        let last = *brain.planned_path(RobotId(1)).unwrap().last().unwrap();
        assert_eq!(last.to.position, p(0, 1));
        assert_eq!(last.end, SimTime(9.0));

        // the put fits in a pause while standing on the station
        let path = brain.planned_path(RobotId(1)).unwrap();
        let paused = path
            .windows(2)
            .any(|w| w[1].from.position == p(0, 3) && w[1].start - w[0].end >= 1.0);
        assert!(paused);
        assert!(brain.store().audit().is_ok());
    }

    #[test]
    fn rest_on_a_wall_is_rejected() {
        let grid = sc_spatial::GridBuilder::new(1, 2).wall(p(0, 1)).build().unwrap();
        let config = PlannerConfig::default().with_rests(RestPolicy::Closest(vec![p(0, 1)]));
        assert!(matches!(PathBrain::new(&grid, config), Err(BrainError::Config(_))));
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use sc_behavior::{Brain, BrainError};
    use sc_core::{Direction, RobotId};
    use sc_spatial::GridBuilder;

    use super::helpers::{at, corridor, mail_for, p, view};
    use crate::{PathBrain, PlannerConfig};

    #[test]
    fn duplicate_and_colliding_robots() {
        let grid = corridor();
        let mut brain = PathBrain::new(&grid, PlannerConfig::default()).unwrap();
        brain.new_robot(&view(1, p(0, 1), Direction::Right, None), &at(0.0, &grid)).unwrap();
        assert!(matches!(
            brain.new_robot(&view(1, p(0, 2), Direction::Right, None), &at(0.0, &grid)),
            Err(BrainError::Config(_))
        ));
        assert!(matches!(
            brain.new_robot(&view(2, p(0, 1), Direction::Right, None), &at(0.0, &grid)),
            Err(BrainError::Config(_))
        ));
    }

    #[test]
    fn unknown_robot() {
        let grid = corridor();
        let mut brain = PathBrain::new(&grid, PlannerConfig::default()).unwrap();
        let err = brain.next_action(&view(5, p(0, 0), Direction::Up, None), &at(0.0, &grid)).unwrap_err();
        assert!(matches!(err, BrainError::UnknownRobot(RobotId(5))));
    }

    #[test]
    fn missing_stations() {
        let grid = GridBuilder::new(1, 2).output(p(0, 1), sc_core::StationId(1)).build().unwrap();
        let mut brain = PathBrain::new(&grid, PlannerConfig::default()).unwrap();
        let empty = view(1, p(0, 0), Direction::Right, None);
        brain.new_robot(&empty, &at(0.0, &grid)).unwrap();
        assert!(matches!(brain.next_action(&empty, &at(0.0, &grid)), Err(BrainError::NoInputStations)));

        let lost = view(1, p(0, 0), Direction::Right, mail_for(9));
        assert!(matches!(brain.next_action(&lost, &at(0.0, &grid)), Err(BrainError::UnknownOutput { .. })));
    }
}
