//! Unit tests for sc-schedule.

use sc_core::{EventId, ProcessId, SimTime};

use crate::{EventQueue, ProcessHost, ScheduleError, Scheduler};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Records every resume as `(process, value, time)`.  When `rearm` is set a
/// resumed process waits on a fresh timeout of that length.
#[derive(Default)]
struct Recorder {
    log: Vec<(ProcessId, &'static str, SimTime)>,
    rearm: Option<f64>,
    fail_on: Option<&'static str>,
}

impl ProcessHost<&'static str> for Recorder {
    type Error = ScheduleError;

    fn resume(
        &mut self,
        sched: &mut Scheduler<&'static str>,
        process: ProcessId,
        value: &'static str,
    ) -> Result<(), ScheduleError> {
        self.log.push((process, value, sched.now()));
        if self.fail_on == Some(value) {
            return Err(ScheduleError::Parse(format!("refused {value}")));
        }
        if let Some(delay) = self.rearm {
            let ev = sched.schedule_timeout(delay, "tick")?;
            sched.wait(process, ev)?;
        }
        Ok(())
    }
}

fn values(rec: &Recorder) -> Vec<&'static str> {
    rec.log.iter().map(|(_, v, _)| *v).collect()
}

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod event_queue {
    use super::*;

    #[test]
    fn pops_in_time_order_fifo_within_time() {
        let mut q = EventQueue::new();
        q.push(SimTime(2.0), EventId(0));
        q.push(SimTime(1.0), EventId(1));
        q.push(SimTime(1.0), EventId(2));
        assert_eq!(q.len(), 3);
        assert_eq!(q.time_count(), 2);
        assert_eq!(q.next_time(), Some(SimTime(1.0)));

        let until = SimTime::INFINITY;
        assert_eq!(q.pop_due(until), Some((SimTime(1.0), EventId(1))));
        assert_eq!(q.pop_due(until), Some((SimTime(1.0), EventId(2))));
        assert_eq!(q.pop_due(until), Some((SimTime(2.0), EventId(0))));
        assert!(q.is_empty());
        assert_eq!(q.pop_due(until), None);
    }

    #[test]
    fn pop_due_respects_bound() {
        let mut q = EventQueue::new();
        q.push(SimTime(5.0), EventId(0));
        assert_eq!(q.pop_due(SimTime(4.9)), None);
        assert_eq!(q.pop_due(SimTime(5.0)), Some((SimTime(5.0), EventId(0))));
    }

    #[test]
    fn push_during_drain_goes_to_back() {
        let mut q = EventQueue::new();
        q.push(SimTime(1.0), EventId(0));
        q.push(SimTime(1.0), EventId(1));
        assert_eq!(q.pop_due(SimTime(1.0)).map(|e| e.1), Some(EventId(0)));
        q.push(SimTime(1.0), EventId(2));
        assert_eq!(q.pop_due(SimTime(1.0)).map(|e| e.1), Some(EventId(1)));
        assert_eq!(q.pop_due(SimTime(1.0)).map(|e| e.1), Some(EventId(2)));
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn spawned_processes_start_in_spawn_order() {
        let mut sched = Scheduler::new();
        let a = sched.spawn("a");
        let b = sched.spawn("b");
        let mut rec = Recorder::default();
        sched.run_until(SimTime::ZERO, &mut rec).unwrap();
        assert_eq!(rec.log, vec![(a, "a", SimTime::ZERO), (b, "b", SimTime::ZERO)]);
    }

    #[test]
    fn run_until_is_inclusive_and_advances_clock() {
        let mut sched = Scheduler::new();
        sched.spawn("start");
        let mut rec = Recorder { rearm: Some(2.0), ..Default::default() };
        sched.run_until(SimTime(4.0), &mut rec).unwrap();
        let times: Vec<f64> = rec.log.iter().map(|(_, _, t)| t.0).collect();
        assert_eq!(times, vec![0.0, 2.0, 4.0]);
        assert_eq!(sched.now(), SimTime(4.0));

        sched.run_until(SimTime(5.0), &mut rec).unwrap();
        assert_eq!(rec.log.len(), 3);
        assert_eq!(sched.now(), SimTime(5.0));
        assert_eq!(sched.peek(), Some(SimTime(6.0)));
    }

    #[test]
    fn equal_time_timeouts_fire_fifo() {
        let mut sched = Scheduler::new();
        let p0 = sched.spawn("s0");
        let p1 = sched.spawn("s1");
        let mut rec = Recorder::default();
        sched.run_until(SimTime::ZERO, &mut rec).unwrap();

        // p1 schedules first, so p1 resumes first
        let e1 = sched.schedule_timeout(1.0, "second-proc").unwrap();
        let e0 = sched.schedule_timeout(1.0, "first-proc").unwrap();
        sched.wait(p1, e1).unwrap();
        sched.wait(p0, e0).unwrap();
        sched.run_until(SimTime(1.0), &mut rec).unwrap();
        assert_eq!(values(&rec)[2..], ["second-proc", "first-proc"]);
        assert_eq!(rec.log[2].0, p1);
    }

    #[test]
    fn succeed_wakes_waiters_in_registration_order() {
        let mut sched = Scheduler::new();
        let p0 = sched.spawn("s");
        let p1 = sched.spawn("s");
        let mut rec = Recorder::default();
        sched.run_until(SimTime::ZERO, &mut rec).unwrap();

        let ev = sched.new_event();
        sched.wait(p1, ev).unwrap();
        sched.wait(p0, ev).unwrap();
        assert!(sched.is_pending(ev));
        sched.succeed(ev, "go").unwrap();
        assert!(!sched.is_pending(ev));
        sched.run_until(SimTime::ZERO, &mut rec).unwrap();
        let woken: Vec<ProcessId> = rec.log[2..].iter().map(|(p, _, _)| *p).collect();
        assert_eq!(woken, vec![p1, p0]);
    }

    #[test]
    fn succeed_twice_is_an_error() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        let ev = sched.new_event();
        sched.succeed(ev, "x").unwrap();
        assert!(matches!(sched.succeed(ev, "y"), Err(ScheduleError::AlreadyTriggered(e)) if e == ev));
    }

    #[test]
    fn any_of_takes_first_value() {
        let mut sched = Scheduler::new();
        let p = sched.spawn("s");
        let mut rec = Recorder::default();
        sched.run_until(SimTime::ZERO, &mut rec).unwrap();

        let slow = sched.schedule_timeout(2.0, "slow").unwrap();
        let fast = sched.schedule_timeout(1.0, "fast").unwrap();
        let either = sched.any_of(slow, fast).unwrap();
        sched.wait(p, either).unwrap();
        sched.run_until(SimTime(3.0), &mut rec).unwrap();
        assert_eq!(values(&rec), vec!["s", "fast"]);
        assert_eq!(rec.log[1].2, SimTime(1.0));
    }

    #[test]
    fn any_of_with_signal_beating_timeout() {
        let mut sched = Scheduler::new();
        let p = sched.spawn("s");
        let mut rec = Recorder::default();
        sched.run_until(SimTime::ZERO, &mut rec).unwrap();

        let grant = sched.new_event();
        let patience = sched.schedule_timeout(5.0, "timeout").unwrap();
        let either = sched.any_of(grant, patience).unwrap();
        sched.wait(p, either).unwrap();
        sched.run_until(SimTime(1.0), &mut rec).unwrap();
        sched.succeed(grant, "granted").unwrap();
        sched.run_until(SimTime(10.0), &mut rec).unwrap();
        assert_eq!(values(&rec), vec!["s", "granted"]);
        assert_eq!(rec.log[1].2, SimTime(1.0));
    }

    #[test]
    fn waiting_on_processed_event_is_stale() {
        let mut sched = Scheduler::new();
        let p = sched.spawn("s");
        let ev = sched.schedule_timeout(0.0, "x").unwrap();
        let mut rec = Recorder::default();
        sched.run_until(SimTime::ZERO, &mut rec).unwrap();
        assert!(matches!(sched.wait(p, ev), Err(ScheduleError::StaleEvent(_))));
    }

    #[test]
    fn double_wait_is_rejected() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        let p = sched.spawn("s");
        let ev = sched.new_event();
        assert!(matches!(sched.wait(p, ev), Err(ScheduleError::AlreadyWaiting(..))));
        assert!(matches!(
            sched.wait(ProcessId(9), ev),
            Err(ScheduleError::ProcessNotFound(_))
        ));
    }

    #[test]
    fn negative_delay_is_rejected() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        assert!(matches!(
            sched.schedule_timeout(-1.0, "x"),
            Err(ScheduleError::NegativeDelay(_))
        ));
        assert!(sched.schedule_timeout(f64::NAN, "x").is_err());
    }

    #[test]
    fn discarded_event_never_fires() {
        let mut sched = Scheduler::new();
        let p = sched.spawn("s");
        let mut rec = Recorder::default();
        sched.run_until(SimTime::ZERO, &mut rec).unwrap();
        let ev = sched.schedule_timeout(1.0, "never").unwrap();
        sched.wait(p, ev).unwrap();
        sched.discard(ev);
        sched.run_until(SimTime(2.0), &mut rec).unwrap();
        assert_eq!(values(&rec), vec!["s"]);
        assert_eq!(sched.live_events(), 0);
    }

    #[test]
    fn host_error_halts_the_run() {
        let mut sched = Scheduler::new();
        sched.spawn("s");
        let mut rec = Recorder { rearm: Some(1.0), fail_on: Some("tick"), ..Default::default() };
        let err = sched.run_until(SimTime(10.0), &mut rec);
        assert!(err.is_err());
        assert_eq!(sched.now(), SimTime(1.0));
        assert_eq!(rec.log.len(), 2);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use sc_core::{MailId, SimTime, StationId};

    use crate::{ScheduleError, load_mail_log_reader};

    #[test]
    fn parses_and_sorts_by_time() {
        let csv = "id,input_id,input_time,destination\n\
                   0,1,3.0,2\n\
                   1,2,1.0,1\n\
                   2,1,1.0,2\n";
        let log = load_mail_log_reader(Cursor::new(csv)).unwrap();
        let ids: Vec<u64> = log.iter().map(|a| a.mail.id.0).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert_eq!(log[0].input, StationId(2));
        assert_eq!(log[0].time, SimTime(1.0));
        assert_eq!(log[2].mail.id, MailId(0));
        assert_eq!(log[2].mail.destination, StationId(2));
    }

    #[test]
    fn rejects_negative_time() {
        let csv = "id,input_id,input_time,destination\n0,1,-1.0,2\n";
        assert!(matches!(load_mail_log_reader(Cursor::new(csv)), Err(ScheduleError::Parse(_))));
    }

    #[test]
    fn rejects_malformed_rows() {
        let csv = "id,input_id,input_time,destination\nzero,1,1.0,2\n";
        assert!(load_mail_log_reader(Cursor::new(csv)).is_err());
    }
}
