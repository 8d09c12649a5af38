use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use waitlist_core::export::{export_csv, export_workbook};
use waitlist_core::{
    today, Collection, Intake, Permission, Role, Session, SlotGrant, UserDirectory, Waitlist,
    WaitlistConfig,
};

use crate::cli::{AddArgs, Cli, ExportArgs, FindArgs, GrantArgs, ListArgs, UsersCommand};
use crate::render::{print_history, print_matches, print_rows, print_users};

/// Loaded configuration plus the authenticated user.
pub struct Workspace {
    pub config: WaitlistConfig,
    pub directory: UserDirectory,
    pub session: Session,
}

impl Workspace {
    /// Load config and users, then log in.
    pub fn open(cli: &Cli) -> Result<Self> {
        let mut config = WaitlistConfig::load(cli.config.as_deref()).context("load config")?;
        if let Some(dir) = &cli.data_dir {
            config.data_dir = dir.clone();
        }

        let users_path = config.users_path();
        let directory = UserDirectory::load(&users_path, &config.bootstrap_admin_password)
            .with_context(|| format!("load users from {}", users_path.display()))?;
        if !users_path.exists() {
            directory
                .save(&users_path)
                .with_context(|| format!("save users to {}", users_path.display()))?;
        }

        let password = cli
            .password
            .as_deref()
            .ok_or_else(|| anyhow!("a password is required (--password or WAITLIST_PASSWORD)"))?;
        let session = directory.authenticate(&cli.user, password).map_err(|error| {
            warn!(user = %cli.user, "Login rejected");
            error
        })?;
        info!(user = %session.username, role = %session.role.label(), "Logged in");

        Ok(Self {
            config,
            directory,
            session,
        })
    }

    fn load_store(&self) -> Result<Waitlist> {
        let waiting = self.config.waiting_path();
        let served = self.config.served_path();
        Waitlist::load(&waiting, &served).with_context(|| {
            format!(
                "load waitlist from {} and {}",
                waiting.display(),
                served.display()
            )
        })
    }

    fn save_store(&self, store: &Waitlist) -> Result<()> {
        store
            .save(&self.config.waiting_path(), &self.config.served_path(), today())
            .context("save waitlist")
    }

    fn save_users(&self) -> Result<()> {
        let path = self.config.users_path();
        self.directory
            .save(&path)
            .with_context(|| format!("save users to {}", path.display()))
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn run_add(ws: &Workspace, args: &AddArgs) -> Result<()> {
    ws.session.require(Permission::RegisterPatient)?;
    let mut store = ws.load_store()?;

    let mut intake = Intake::new(
        args.name.clone(),
        args.first_contact.unwrap_or_else(today),
        args.specialty.into(),
    );
    intake.membership_id = args.membership_id.clone();
    intake.phone = args.phone.clone();
    intake.preferred_time_slot = args.time_slot.into();
    intake.professional_preference = args.preferred_professional.clone();

    let id = store.add_to_waiting(intake, &ws.session.username, now())?;
    ws.save_store(&store)?;

    println!("Registered {} ({} waiting)", args.name.trim(), store.waiting().len());
    info!(record = %id, "Patient registered");
    Ok(())
}

pub fn run_list(ws: &Workspace, args: &ListArgs) -> Result<()> {
    let collection = if args.served {
        Collection::Served
    } else {
        Collection::Waiting
    };
    let store = ws.load_store()?;
    let as_of = args.as_of.unwrap_or_else(today);
    print_rows(collection, &store.rows(collection, as_of));
    Ok(())
}

pub fn run_grant(ws: &Workspace, args: &GrantArgs) -> Result<()> {
    ws.session.require(Permission::GrantSlot)?;
    let mut store = ws.load_store()?;

    let entry = args
        .row
        .checked_sub(1)
        .and_then(|index| store.waiting().get(index))
        .ok_or_else(|| anyhow!("no waiting patient at row {}", args.row))?;
    let id = entry.id;
    let name = entry.record.name.clone();

    let grant = SlotGrant::new(args.professional.clone(), args.time_slot.clone(), args.start_date);
    store.grant_slot(id, grant, &ws.session.username, now())?;
    ws.save_store(&store)?;

    println!(
        "Slot granted to {name}: {} with {} from {}",
        args.time_slot.trim(),
        args.professional.trim(),
        args.start_date
    );
    Ok(())
}

pub fn run_find(ws: &Workspace, args: &FindArgs) -> Result<()> {
    let store = ws.load_store()?;
    let matches = store.find_by_name(&args.query, args.limit);
    if matches.is_empty() {
        println!("No patient matches \"{}\"", args.query);
        return Ok(());
    }
    print_matches(&matches, today());
    Ok(())
}

pub fn run_export(ws: &Workspace, args: &ExportArgs) -> Result<PathBuf> {
    let store = ws.load_store()?;
    let as_of = today();

    let path = if args.csv {
        let collection = if args.served {
            Collection::Served
        } else {
            Collection::Waiting
        };
        let path = match &args.output {
            Some(path) => path.clone(),
            None => ws.config.export_path().with_extension("csv"),
        };
        let file = std::fs::File::create(&path)
            .with_context(|| format!("create {}", path.display()))?;
        export_csv(file, &store, collection, as_of)?;
        path
    } else {
        let path = args.output.clone().unwrap_or_else(|| ws.config.export_path());
        export_workbook(&path, &store, as_of)?;
        path
    };

    info!(path = %path.display(), "Export written");
    println!("Exported to {}", path.display());
    Ok(path)
}

pub fn run_history(ws: &Workspace) -> Result<()> {
    ws.session.require(Permission::ViewHistory)?;
    let store = ws.load_store()?;
    print_history(&store.history());
    Ok(())
}

pub fn run_users(ws: &mut Workspace, command: &UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List => {
            ws.session.require(Permission::ManageUsers)?;
            print_users(ws.directory.users());
            return Ok(());
        }
        UsersCommand::Add {
            username,
            new_password,
            role,
        } => {
            ws.session.require(Permission::ManageUsers)?;
            ws.directory.add_user(username, new_password, (*role).into())?;
            println!("User {} created", username.trim());
        }
        UsersCommand::Remove { username } => {
            ws.session.require(Permission::ManageUsers)?;
            if username == &ws.session.username {
                bail!("you cannot remove your own account");
            }
            ws.directory.remove_user(username)?;
            println!("User {username} removed");
        }
        UsersCommand::Role { username, role } => {
            ws.session.require(Permission::ManageUsers)?;
            let role = Role::from(*role);
            ws.directory.set_role(username, role)?;
            println!("User {username} is now {}", role.label());
        }
        // Any user may change their own password
        UsersCommand::Passwd { new_password, confirm } => {
            let username = ws.session.username.clone();
            ws.directory.change_password(&username, new_password, confirm)?;
            println!("Password changed for {username}");
        }
    }
    ws.save_users()
}
