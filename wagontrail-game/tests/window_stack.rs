use wagontrail_game::director::events::vehicle::OxenDied;
use wagontrail_game::error::GameError;
use wagontrail_game::window::{
    Form, FormKind, FormRegistry, FormView, WindowContext, WindowRegistry, WindowState,
    default_form,
};
use wagontrail_game::{
    ContentLoader, Entity, EventTarget, PartySetup, Profession, Pulse, SimConfig, Simulation,
    StaticContent, WindowKind, WindowManager,
};

fn simulation() -> Simulation {
    let content = StaticContent.load_content().unwrap();
    Simulation::new(content, SimConfig::default(), 11).unwrap()
}

/// Window that counts the ticks each of its forms receives.
#[derive(Debug, Default)]
struct Probe<const N: usize> {
    first_ticks: u32,
    second_ticks: u32,
    close_on_tick: bool,
}

macro_rules! probe_window {
    ($n:literal, $kind:expr) => {
        impl WindowState for Probe<$n> {
            const KIND: WindowKind = $kind;

            fn create(_sim: &Simulation) -> Self {
                Self::default()
            }

            fn forms() -> FormRegistry<Self> {
                FormRegistry::new()
                    .with(FormKind::Drive, default_form::<First, Self>)
                    .with(FormKind::Resting, default_form::<Second, Self>)
            }

            fn header(&self, _sim: &Simulation) -> String {
                format!(
                    "probe {} first={} second={}\n",
                    $n, self.first_ticks, self.second_ticks
                )
            }

            fn on_post_create(ctx: &mut WindowContext<'_, Self>) -> Result<(), GameError> {
                ctx.set_form(FormKind::Drive);
                Ok(())
            }
        }
    };
}

probe_window!(0, WindowKind::MainMenu);
probe_window!(1, WindowKind::Travel);
probe_window!(2, WindowKind::Store);

trait Counters {
    fn first(&mut self) -> &mut u32;
    fn second(&mut self) -> &mut u32;
    fn close_on_tick(&mut self) -> &mut bool;
}

impl<const N: usize> Counters for Probe<N> {
    fn first(&mut self) -> &mut u32 {
        &mut self.first_ticks
    }

    fn second(&mut self) -> &mut u32 {
        &mut self.second_ticks
    }

    fn close_on_tick(&mut self) -> &mut bool {
        &mut self.close_on_tick
    }
}

/// Shared input handling: "swap" chains two requests, "close" flags the
/// window, "arm" flags it from inside the next tick.
fn probe_input<D: Counters>(ctx: &mut WindowContext<'_, D>, input: &str) {
    match input {
        "first" => ctx.set_form(FormKind::Drive),
        "second" => ctx.set_form(FormKind::Resting),
        "swap" => {
            ctx.set_form(FormKind::Drive);
            ctx.set_form(FormKind::Resting);
        }
        "close" => ctx.remove_window(),
        "arm" => *ctx.data.close_on_tick() = true,
        _ => {}
    }
}

#[derive(Debug, Default)]
struct First;

impl<D: Counters> Form<D> for First {
    fn kind(&self) -> FormKind {
        FormKind::Drive
    }

    fn render(&self, _view: FormView<'_, D>) -> String {
        String::from("first form")
    }

    fn on_input(&mut self, ctx: &mut WindowContext<'_, D>, input: &str) -> Result<(), GameError> {
        probe_input(ctx, input);
        Ok(())
    }

    fn on_tick(&mut self, ctx: &mut WindowContext<'_, D>, _pulse: Pulse) -> Result<(), GameError> {
        *ctx.data.first() += 1;
        if *ctx.data.close_on_tick() {
            ctx.remove_window();
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Second;

impl<D: Counters> Form<D> for Second {
    fn kind(&self) -> FormKind {
        FormKind::Resting
    }

    fn render(&self, _view: FormView<'_, D>) -> String {
        String::from("second form")
    }

    fn on_input(&mut self, ctx: &mut WindowContext<'_, D>, input: &str) -> Result<(), GameError> {
        probe_input(ctx, input);
        Ok(())
    }

    fn on_tick(&mut self, ctx: &mut WindowContext<'_, D>, _pulse: Pulse) -> Result<(), GameError> {
        *ctx.data.second() += 1;
        Ok(())
    }
}

fn probe_manager() -> WindowManager {
    let mut registry = WindowRegistry::new();
    registry.register::<Probe<0>>();
    registry.register::<Probe<1>>();
    registry.register::<Probe<2>>();
    WindowManager::new(registry)
}

#[test]
fn only_the_top_window_is_ticked() {
    let mut sim = simulation();
    let mut manager = probe_manager();
    manager.add(WindowKind::MainMenu, &mut sim).unwrap();
    manager.add(WindowKind::Travel, &mut sim).unwrap();
    manager.add(WindowKind::Store, &mut sim).unwrap();

    for _ in 0..3 {
        manager.tick(&mut sim, Pulse::SIMULATION).unwrap();
    }
    assert!(manager.active_window_text(&sim).contains("probe 2 first=3"));

    manager.send_input(&mut sim, "close").unwrap();
    manager.tick(&mut sim, Pulse::SYSTEM).unwrap();
    assert_eq!(manager.top_kind(), Some(WindowKind::Travel));
    assert!(manager.active_window_text(&sim).contains("probe 1 first=1"));

    manager.send_input(&mut sim, "close").unwrap();
    manager.tick(&mut sim, Pulse::SYSTEM).unwrap();
    assert!(manager.active_window_text(&sim).contains("probe 0 first=1"));
    assert_eq!(manager.current_window_count(), 1);
}

#[test]
fn duplicate_live_windows_are_rejected() {
    let mut sim = simulation();
    let mut manager = probe_manager();
    manager.add(WindowKind::Travel, &mut sim).unwrap();
    assert!(matches!(
        manager.add(WindowKind::Travel, &mut sim),
        Err(GameError::DuplicateWindow(WindowKind::Travel))
    ));
    assert!(matches!(
        manager.add(WindowKind::GameOver, &mut sim),
        Err(GameError::UnregisteredWindow(WindowKind::GameOver))
    ));
}

#[test]
fn last_form_request_wins() {
    let mut sim = simulation();
    let mut manager = probe_manager();
    manager.add(WindowKind::MainMenu, &mut sim).unwrap();

    manager.send_input(&mut sim, "swap").unwrap();
    assert_eq!(manager.top_form(), Some(FormKind::Resting));
    manager.tick(&mut sim, Pulse::SIMULATION).unwrap();
    manager.tick(&mut sim, Pulse::SIMULATION).unwrap();
    let text = manager.active_window_text(&sim);
    assert!(text.contains("first=0 second=2"));
    assert!(text.contains("second form"));

    manager.send_input(&mut sim, "first").unwrap();
    manager.send_input(&mut sim, "second").unwrap();
    manager.tick(&mut sim, Pulse::SIMULATION).unwrap();
    assert!(manager.active_window_text(&sim).contains("first=0 second=3"));
}

#[test]
fn removal_flagged_during_a_tick_waits_for_the_next_tick() {
    let mut sim = simulation();
    let mut manager = probe_manager();
    manager.add(WindowKind::MainMenu, &mut sim).unwrap();
    manager.add(WindowKind::Travel, &mut sim).unwrap();

    manager.send_input(&mut sim, "arm").unwrap();
    manager.tick(&mut sim, Pulse::SIMULATION).unwrap();
    assert!(manager.is_pending_removal(WindowKind::Travel));
    assert_eq!(manager.top_kind(), Some(WindowKind::Travel));
    assert!(manager.active_window_text(&sim).contains("probe 1 first=1"));
    assert!(!manager.accepts_input());

    manager.tick(&mut sim, Pulse::SIMULATION).unwrap();
    assert_eq!(manager.kinds(), vec![WindowKind::MainMenu]);
    assert!(manager.active_window_text(&sim).contains("probe 0 first=1"));
}

#[test]
fn resting_discards_typed_input() {
    let mut sim = simulation();
    sim.start_game(&PartySetup::new(Profession::Carpenter, 3));
    sim.world.vehicle.inventory.add(Entity::Animal, 4).unwrap();
    let mut manager = WindowManager::default();
    manager.add(WindowKind::Travel, &mut sim).unwrap();

    manager.send_input(&mut sim, "StopToRest").unwrap();
    assert_eq!(manager.top_form(), Some(FormKind::RestDays));
    manager.send_input(&mut sim, "3").unwrap();
    assert_eq!(manager.top_form(), Some(FormKind::Resting));
    assert!(!manager.accepts_input());

    let before = manager.active_window_text(&sim);
    manager.send_input(&mut sim, "5").unwrap();
    assert_eq!(manager.active_window_text(&sim), before);
    assert!(before.contains("3 days left"));
}

#[test]
fn fired_event_freezes_travel_until_acknowledged() {
    let mut sim = simulation();
    sim.start_game(&PartySetup::new(Profession::Carpenter, 3));
    sim.world.vehicle.inventory.add(Entity::Animal, 4).unwrap();
    sim.world.vehicle.inventory.add(Entity::Food, 300).unwrap();
    let mut manager = WindowManager::default();
    manager.add(WindowKind::Travel, &mut sim).unwrap();
    manager.send_input(&mut sim, "StopToRest").unwrap();
    manager.send_input(&mut sim, "2").unwrap();
    let frozen = manager.active_window_text(&sim);

    let (director, world) = sim.director_and_world();
    director
        .trigger_event::<OxenDied>(world, EventTarget::Vehicle)
        .unwrap();
    manager.tick(&mut sim, Pulse::SYSTEM).unwrap();
    assert_eq!(
        manager.kinds(),
        vec![WindowKind::Travel, WindowKind::RandomEvent]
    );
    assert!(manager.active_window_text(&sim).contains("One of your oxen has died"));

    for _ in 0..3 {
        manager.tick(&mut sim, Pulse::SIMULATION).unwrap();
    }
    assert_eq!(sim.total_turns(), 0);

    manager.send_input(&mut sim, "").unwrap();
    manager.tick(&mut sim, Pulse::SYSTEM).unwrap();
    assert_eq!(manager.top_kind(), Some(WindowKind::Travel));
    assert_eq!(manager.top_form(), Some(FormKind::Resting));
    assert_eq!(manager.active_window_text(&sim), frozen);

    manager.tick(&mut sim, Pulse::SIMULATION).unwrap();
    assert_eq!(sim.total_turns(), 1);
}
