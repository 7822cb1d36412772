use wgpu_attention_viewer::Scheduler;

#[test]
fn test_tick_while_stopped_should_issue_nothing() {
    let mut scheduler = Scheduler::new(100.0, 1000.0);

    let tasks = scheduler.tick(5000.0);
    assert_eq!(tasks.hover, 0);
    assert_eq!(tasks.decay, 0);
}

#[test]
fn test_tick_should_fire_once_per_elapsed_interval_and_keep_the_remainder() {
    let mut scheduler = Scheduler::new(100.0, 1000.0);
    scheduler.start();

    let tasks = scheduler.tick(250.0);
    assert_eq!(tasks.hover, 2);
    assert_eq!(tasks.decay, 0);

    // The 50 ms remainder carries over into the next frame.
    let tasks = scheduler.tick(50.0);
    assert_eq!(tasks.hover, 1);

    let tasks = scheduler.tick(30.0);
    assert_eq!(tasks.hover, 0);
}

#[test]
fn test_tick_should_fire_the_decay_task_on_its_own_interval() {
    let mut scheduler = Scheduler::new(100.0, 1000.0);
    scheduler.start();

    let tasks = scheduler.tick(2100.0);
    assert_eq!(tasks.hover, 21);
    assert_eq!(tasks.decay, 2);
}

#[test]
fn test_start_should_be_idempotent_and_clear_accumulated_time() {
    let mut scheduler = Scheduler::new(100.0, 1000.0);
    scheduler.start();
    let generation = scheduler.generation();

    // A second start while running changes nothing.
    scheduler.start();
    assert_eq!(scheduler.generation(), generation);

    scheduler.tick(90.0);
    scheduler.stop();
    scheduler.start();

    // The 90 ms accumulated before the stop does not leak into the restart.
    let tasks = scheduler.tick(20.0);
    assert_eq!(tasks.hover, 0);
}

#[test]
fn test_stop_should_invalidate_in_flight_tasks() {
    let mut scheduler = Scheduler::new(100.0, 1000.0);
    scheduler.start();

    let tasks = scheduler.tick(100.0);
    assert!(scheduler.is_current(&tasks));

    scheduler.stop();
    assert!(!scheduler.is_current(&tasks));

    // Tasks from before a restart stay stale under the new generation.
    scheduler.start();
    assert!(!scheduler.is_current(&tasks));
}

#[test]
fn test_stop_should_be_idempotent() {
    let mut scheduler = Scheduler::new(100.0, 1000.0);
    scheduler.start();
    scheduler.stop();
    let generation = scheduler.generation();

    scheduler.stop();
    assert_eq!(scheduler.generation(), generation);
    assert!(!scheduler.is_running());
}

#[test]
fn test_set_interval_should_clamp_to_at_least_one_millisecond() {
    let mut scheduler = Scheduler::new(100.0, 1000.0);
    scheduler.start();

    scheduler.set_hover_interval_ms(0.0);
    let tasks = scheduler.tick(3.0);
    assert_eq!(tasks.hover, 3);
}

#[test]
fn test_shrinking_an_interval_should_not_fire_a_burst_of_stale_tasks() {
    let mut scheduler = Scheduler::new(1000.0, 1000.0);
    scheduler.start();
    scheduler.tick(900.0);

    // The accumulated 900 ms is clamped down to the new interval, so the
    // next tick fires at most one task plus whatever newly elapsed.
    scheduler.set_hover_interval_ms(10.0);
    let tasks = scheduler.tick(1.0);
    assert_eq!(tasks.hover, 1);
}
