use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use job_server::config::ServerConfig;
use job_server::data::ItemRegistry;
use job_server::job::{
    CheckOutcome, CheckTrigger, JobAssignments, JobRegistry, ModifierFlags, Objective,
    ObjectiveKind, PlayerContext, Services, VehicleRef,
};
use job_server::position::Vec3;
use job_server::protocol::ServerMessage;
use job_server::session::Session;
use job_server::skills::SkillBook;
use job_server::words::WordList;

const DEMO_PLAYER: &str = "demo";
const WALK_SPEED: f32 = 1.5;
const DRIVE_SPEED: f32 = 4.0;

/// Put the demo player in the state the objective asks for and move them
/// toward it.
fn drive_demo_player(session: &mut Session, objective: &Objective, items: &ItemRegistry) {
    let flags = objective.flags();
    if flags.contains(ModifierFlags::IN_VEHICLE) && !session.in_vehicle() {
        session.enter_vehicle(VehicleRef(1));
    } else if flags.contains(ModifierFlags::ON_FOOT) && session.in_vehicle() {
        session.exit_vehicle();
    }

    // Pick up whatever the objective insists on
    for restriction in objective.item_restrictions().unwrap_or_default() {
        if restriction.requires_in_inventory && !restriction.is_met(session.item_count(&restriction.label)) {
            if let Some(item) = items.get(&restriction.label) {
                session.grant_item(item, restriction.quantity.max(1));
            }
        }
    }

    if let Some(target) = objective.position() {
        let speed = if session.in_vehicle() { DRIVE_SPEED } else { WALK_SPEED };
        session.move_toward(target, speed);
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("job_server=info")),
        )
        .init();

    let config = match ServerConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return;
        }
    };

    // Load item registry from TOML files
    let mut items = ItemRegistry::new();
    if let Err(e) = items.load_from_directory(&config.data_dir) {
        error!("Failed to load item registry: {}", e);
    }

    // Load job templates from TOML files
    let mut jobs = JobRegistry::new();
    if let Err(e) = jobs.load_from_directory(&config.data_dir) {
        error!("Failed to load job registry: {}", e);
    }

    let words = match config.words_file {
        Some(ref path) => WordList::load(path).unwrap_or_else(|e| {
            warn!("Failed to load word list, using built-in words: {}", e);
            WordList::builtin()
        }),
        None => WordList::builtin(),
    };

    let skills = SkillBook::new(config.skills.as_slice());
    let assignments = JobAssignments::new(config.replace_policy);

    info!(
        "Job server ready: {} items, {} jobs, {} skills, {} words",
        items.len(),
        jobs.len(),
        skills.skill_count(),
        words.len()
    );

    let job_id = config
        .demo_job
        .clone()
        .or_else(|| jobs.ids().first().map(|id| id.to_string()));
    let Some(job_id) = job_id else {
        warn!("No jobs loaded, nothing to run");
        return;
    };

    // Outbound messages for the demo player
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            debug!("-> {} {}", msg.msg_type(), msg.to_json());
            if let ServerMessage::Notify { text } = msg {
                info!("[{}] {}", DEMO_PLAYER, text);
            }
        }
    });

    let mut session = Session::new(DEMO_PLAYER, Vec3::default(), tx);

    let job = match jobs.instantiate(&job_id, DEMO_PLAYER, &words, &skills) {
        Ok(job) => job,
        Err(e) => {
            error!("Failed to build job '{}': {}", job_id, e);
            return;
        }
    };
    if let Err(e) = assignments.assign(&mut session, job) {
        error!("Failed to assign job '{}': {}", job_id, e);
        return;
    }

    // Game loop (20 Hz by default)
    let services = Services::new(&items, &skills);
    let mut interval = tokio::time::interval(config.tick_interval());
    let mut ticks = 0;

    while ticks < config.demo_ticks {
        interval.tick().await;
        ticks += 1;

        let Some(objective) = assignments.current_objective(DEMO_PLAYER) else {
            break;
        };
        drive_demo_player(&mut session, &objective, &items);

        let trigger = match objective.kind() {
            ObjectiveKind::GoToPoint | ObjectiveKind::CaptureZone => CheckTrigger::Tick,
            _ => CheckTrigger::Interact,
        };

        match assignments.check(&mut session, services, &trigger) {
            Ok(CheckOutcome::Completed) => {
                info!("Demo job '{}' finished after {} ticks", job_id, ticks);
                break;
            }
            Ok(CheckOutcome::Advanced) => {
                debug!("Objective cleared at tick {}", ticks);
            }
            Ok(_) => {}
            Err(e) => {
                error!("Job check failed: {}", e);
                assignments.forget(DEMO_PLAYER);
                break;
            }
        }
    }

    if assignments.has_job(DEMO_PLAYER) {
        let looping = assignments
            .with_job(DEMO_PLAYER, |job| job.is_looping())
            .unwrap_or(false);
        info!(
            "Demo stopped after {} ticks with job still running (looping: {})",
            ticks, looping
        );
        assignments.forget(DEMO_PLAYER);
    }

    for skill in &config.skills {
        info!("{} earned {} {} XP", DEMO_PLAYER, skills.xp_for(DEMO_PLAYER, skill), skill);
    }
    skills.forget_player(DEMO_PLAYER);
    for slot in session.inventory.to_update() {
        info!("{} holds {}x {}", DEMO_PLAYER, slot.quantity, slot.item_id);
    }

    // Closing the session ends the writer task
    drop(session);
    if let Err(e) = writer.await {
        error!("Writer task failed: {}", e);
    }
}
