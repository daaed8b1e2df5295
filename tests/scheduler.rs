mod tests {
    use calcifer_lamp::scheduler::{
        AnimationScheduler, AnimationState, SchedulerError, TaskKind, progress_of,
    };
    use embassy_time::{Duration, Instant};

    const EPSILON: f32 = 1e-5;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Probe {
        A,
        B,
    }

    #[test]
    fn test_one_shot_runs_for_duration() {
        let mut scheduler = AnimationScheduler::<Probe, 4>::new();
        scheduler
            .start(1, Instant::from_millis(0), Duration::from_millis(100), TaskKind::OneShot, Probe::A)
            .unwrap();

        let mut last_progress = 0.0;
        let mut completed_at = None;
        for t in (0..=150).step_by(10) {
            scheduler.update(Instant::from_millis(t), |probe, param| {
                assert_eq!(probe, Probe::A);
                assert_eq!(param.slot, 1);
                assert!(param.progress >= last_progress);
                assert!((0.0..=1.0).contains(&param.progress));
                last_progress = param.progress;
                if param.state == AnimationState::Completed {
                    completed_at = Some(t);
                }
            });
        }

        assert_eq!(completed_at, Some(100));
        assert!((last_progress - 1.0).abs() < EPSILON);
        assert!(!scheduler.is_active(1));
    }

    #[test]
    fn test_first_update_reports_started() {
        let mut scheduler = AnimationScheduler::<Probe, 4>::new();
        scheduler
            .start(0, Instant::from_millis(0), Duration::from_millis(100), TaskKind::OneShot, Probe::A)
            .unwrap();

        let mut states = Vec::new();
        for t in [0, 50, 100] {
            scheduler.update(Instant::from_millis(t), |_, param| states.push(param.state));
        }
        assert_eq!(
            states,
            [
                AnimationState::Started,
                AnimationState::Progress,
                AnimationState::Completed
            ]
        );
    }

    #[test]
    fn test_progress_tracks_elapsed_time() {
        let mut scheduler = AnimationScheduler::<Probe, 4>::new();
        scheduler
            .start(2, Instant::from_millis(1000), Duration::from_millis(200), TaskKind::OneShot, Probe::A)
            .unwrap();

        scheduler.update(Instant::from_millis(1050), |_, _| {});
        assert!((scheduler.progress(2).unwrap() - 0.25).abs() < EPSILON);
        scheduler.update(Instant::from_millis(1150), |_, _| {});
        assert!((scheduler.progress(2).unwrap() - 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_start_replaces_running_task() {
        let mut scheduler = AnimationScheduler::<Probe, 4>::new();
        scheduler
            .start(0, Instant::from_millis(0), Duration::from_millis(100), TaskKind::OneShot, Probe::A)
            .unwrap();
        scheduler.update(Instant::from_millis(80), |_, _| {});

        scheduler
            .start(0, Instant::from_millis(80), Duration::from_millis(100), TaskKind::OneShot, Probe::B)
            .unwrap();
        assert_eq!(scheduler.animation(0), Some(Probe::B));

        let mut seen = Vec::new();
        scheduler.update(Instant::from_millis(90), |probe, param| seen.push((probe, param.progress)));
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, Probe::B);
        assert!((seen[0].1 - 0.1).abs() < EPSILON);
    }

    #[test]
    fn test_stop_discards_task() {
        let mut scheduler = AnimationScheduler::<Probe, 4>::new();
        scheduler
            .start(3, Instant::from_millis(0), Duration::from_millis(100), TaskKind::Continuous, Probe::A)
            .unwrap();
        assert!(scheduler.is_active(3));

        scheduler.stop(3).unwrap();
        assert!(!scheduler.is_active(3));
        assert!(!scheduler.has_active());

        let mut calls = 0;
        scheduler.update(Instant::from_millis(50), |_, _| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_continuous_task_restarts() {
        let mut scheduler = AnimationScheduler::<Probe, 4>::new();
        scheduler
            .start(0, Instant::from_millis(0), Duration::from_millis(100), TaskKind::Continuous, Probe::A)
            .unwrap();

        let mut completions = 0;
        for t in (0..=350).step_by(10) {
            scheduler.update(Instant::from_millis(t), |_, param| {
                if param.state == AnimationState::Completed {
                    completions += 1;
                }
            });
        }

        assert_eq!(completions, 3);
        assert!(scheduler.is_active(0));
        assert!((scheduler.progress(0).unwrap() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_slots_update_in_order() {
        let mut scheduler = AnimationScheduler::<Probe, 4>::new();
        let now = Instant::from_millis(0);
        scheduler.start(2, now, Duration::from_millis(100), TaskKind::OneShot, Probe::B).unwrap();
        scheduler.start(0, now, Duration::from_millis(100), TaskKind::OneShot, Probe::A).unwrap();

        let mut order = Vec::new();
        scheduler.update(Instant::from_millis(10), |probe, param| order.push((param.slot, probe)));
        assert_eq!(order, [(0, Probe::A), (2, Probe::B)]);
    }

    #[test]
    fn test_slot_out_of_range() {
        let mut scheduler = AnimationScheduler::<Probe, 4>::new();
        assert_eq!(scheduler.capacity(), 4);
        assert_eq!(
            scheduler.start(4, Instant::from_millis(0), Duration::from_millis(10), TaskKind::OneShot, Probe::A),
            Err(SchedulerError::SlotOutOfRange(4))
        );
        assert_eq!(scheduler.stop(7), Err(SchedulerError::SlotOutOfRange(7)));
        assert!(!scheduler.is_active(4));
    }

    #[test]
    fn test_progress_of() {
        assert_eq!(progress_of(Duration::from_millis(0), Duration::from_millis(0)), 1.0);
        assert_eq!(progress_of(Duration::from_millis(0), Duration::from_millis(100)), 0.0);
        assert_eq!(progress_of(Duration::from_millis(250), Duration::from_millis(100)), 1.0);
        assert!((progress_of(Duration::from_millis(50), Duration::from_millis(100)) - 0.5).abs() < EPSILON);
    }
}
