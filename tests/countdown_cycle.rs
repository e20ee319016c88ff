// End-to-end runs of the countdown with real and shortened durations
use pomodoro_timer::pomodoro::{Countdown, DisplayEmphasis, PomodoroMode, TimerConfig};
use pretty_assertions::assert_eq;

#[test]
fn test_work_then_short_break_then_work() {
    let mut countdown = Countdown::new(TimerConfig::default());
    assert_eq!(countdown.remaining_seconds(), 1500);

    countdown.toggle_running();
    assert!(countdown.is_running());

    let mut events = Vec::new();
    for _ in 0..1500 {
        events.extend(countdown.tick());
    }
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].mode, PomodoroMode::ShortBreak);
    assert_eq!(countdown.mode(), PomodoroMode::ShortBreak);
    assert_eq!(countdown.remaining_seconds(), 300);
    assert_eq!(countdown.completed_work_cycles(), 1);
    assert!(countdown.is_running());

    for _ in 0..300 {
        events.extend(countdown.tick());
    }
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].mode, PomodoroMode::Work);
    assert_eq!(countdown.mode(), PomodoroMode::Work);
    assert_eq!(countdown.remaining_seconds(), 1500);
    assert_eq!(countdown.completed_work_cycles(), 1);
}

#[test]
fn test_full_day_with_two_second_phases() {
    let config = TimerConfig::new(2, 2, 2, 4).unwrap();
    let mut countdown = Countdown::new(config);
    countdown.toggle_running();

    let mut entered = Vec::new();
    for _ in 0..32 {
        if let Some(event) = countdown.tick() {
            entered.push(event.mode);
        }
    }

    use PomodoroMode::{LongBreak, ShortBreak, Work};
    assert_eq!(
        entered,
        vec![
            ShortBreak, Work, ShortBreak, Work, ShortBreak, Work, LongBreak, Work, ShortBreak,
            Work, ShortBreak, Work, ShortBreak, Work, LongBreak, Work,
        ]
    );
    assert_eq!(countdown.completed_work_cycles(), 8);
}

#[test]
fn test_manual_controls_between_ticks() {
    let config = TimerConfig::new(10, 5, 8, 4).unwrap();
    let mut countdown = Countdown::new(config);

    countdown.toggle_running();
    countdown.tick();
    countdown.tick();
    assert_eq!(countdown.format_display(), "00:08");

    countdown.switch_mode(PomodoroMode::LongBreak);
    assert_eq!(countdown.remaining_seconds(), 8);
    assert_eq!(countdown.display_emphasis(), DisplayEmphasis::Active);

    countdown.reset();
    assert_eq!(countdown.mode(), PomodoroMode::LongBreak);
    assert_eq!(countdown.display_emphasis(), DisplayEmphasis::Inactive);

    // paused: ticks change nothing
    for _ in 0..20 {
        assert_eq!(countdown.tick(), None);
    }
    assert_eq!(countdown.remaining_seconds(), 8);
    assert_eq!(countdown.completed_work_cycles(), 0);
}
