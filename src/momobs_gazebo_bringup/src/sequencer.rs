//! Gazebo bringup launch sequence for the ANYmal C quadruped
//!
//! Resolves the installed packages, loads the robot description and
//! assembles the ordered action list: argument declarations, description
//! and bridge includes, the optional plotters, the quadruped controller,
//! the Gazebo server and client, a pacing timer, the spawner, and the two
//! controller activations.

use crate::{
    ament::PackageLocator,
    description::{DescriptionDocument, TemplateProcessor},
    error::Result,
    ir::{
        Action, ActionKind, Condition, Expr, LaunchDescription, NodeDecl, ParamDecl, ProcessDecl,
        RemapDecl,
    },
};
use std::path::PathBuf;

pub const DESCRIPTION_PACKAGE: &str = "anymal_c_simple_description";
pub const BRIDGE_PACKAGE: &str = "momobs_ros2";
pub const CONFIG_PACKAGE: &str = "anymal_c_config";

pub const FORCE_ARG: &str = "force";
pub const RESIDUALS_ARG: &str = "residuals";

pub const PLOT_PACKAGE: &str = "momobs_plot";
pub const FORCE_PLOTTER: &str = "force_plotter.py";
pub const RESIDUAL_PLOTTER: &str = "residual_plotter.py";

pub const CONTROLLER_PACKAGE: &str = "champ_base";
pub const CONTROLLER_EXECUTABLE: &str = "quadruped_controller_node";
pub const JOINT_CONTROLLER_TOPIC: &str = "/joint_group_position_controller/joint_trajectory";
pub const LOOP_RATE: f64 = 500.0;

pub const SPAWNER_PACKAGE: &str = "gazebo_ros";
pub const SPAWNER_EXECUTABLE: &str = "spawn_entity.py";
pub const ENTITY_NAME: &str = "ANYmal";
pub const DESCRIPTION_TOPIC: &str = "/robot_description";
/// Initial pose as (flag, value): x, y, z, roll, pitch, yaw
pub const SPAWN_POSE: [(&str, &str); 6] = [
    ("-x", "0.0"),
    ("-y", "0.0"),
    ("-z", "0.6"),
    ("-R", "0"),
    ("-P", "0"),
    ("-Y", "0.0"),
];

pub const GAZEBO_SERVER: &str = "gzserver";
pub const GAZEBO_CLIENT: &str = "gzclient";
pub const GAZEBO_PLUGINS: [&str; 2] = ["libgazebo_ros_init.so", "libgazebo_ros_factory.so"];

pub const POSITION_CONTROLLER: &str = "joint_group_position_controller";
pub const STATE_BROADCASTER: &str = "joint_state_broadcaster";

/// Delay before spawning; nothing checks that Gazebo is actually ready
pub const SPAWN_DELAY: f64 = 1.0;

const SCREEN: &str = "screen";

/// Invocation flags selecting the optional plot nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchFlags {
    pub force: bool,
    pub residuals: bool,
}

impl LaunchFlags {
    fn launch_arguments(&self) -> [(&'static str, bool); 2] {
        [(FORCE_ARG, self.force), (RESIDUALS_ARG, self.residuals)]
    }
}

/// Filesystem locations derived from the installed packages
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPaths {
    pub description_launch: PathBuf,
    pub gazebo_description_launch: PathBuf,
    pub bridge_launch: PathBuf,
    pub model: PathBuf,
    pub joints_config: PathBuf,
    pub gait_config: PathBuf,
    pub links_config: PathBuf,
}

impl ResolvedPaths {
    /// Look up all three packages; fails on the first one that is missing
    pub fn resolve(locator: &dyn PackageLocator) -> Result<Self> {
        let description_pkg = locator.get_package_share_directory(DESCRIPTION_PACKAGE)?;
        let bridge_pkg = locator.get_package_share_directory(BRIDGE_PACKAGE)?;
        let config_pkg = locator.get_package_share_directory(CONFIG_PACKAGE)?;

        Ok(Self {
            description_launch: description_pkg
                .join("launch/floating_base_description.launch.py"),
            gazebo_description_launch: description_pkg
                .join("launch/gazebo_description.launch.py"),
            bridge_launch: bridge_pkg.join("launch/gazebo_wrapper.launch.py"),
            model: description_pkg.join("urdf/anymal_main.xacro"),
            joints_config: config_pkg.join("config/joints/joints.yaml"),
            gait_config: config_pkg.join("config/gait/gait.yaml"),
            links_config: config_pkg.join("config/links/links.yaml"),
        })
    }
}

/// Builds the bringup `LaunchDescription`
pub struct LaunchSequencer<'a> {
    locator: &'a dyn PackageLocator,
    processor: &'a dyn TemplateProcessor,
}

impl<'a> LaunchSequencer<'a> {
    pub fn new(locator: &'a dyn PackageLocator, processor: &'a dyn TemplateProcessor) -> Self {
        Self { locator, processor }
    }

    /// Assemble the full action sequence.
    ///
    /// Package lookup and description expansion both happen before any action
    /// is constructed, so an error leaves nothing behind.
    pub fn build(&self, flags: &LaunchFlags) -> Result<LaunchDescription> {
        let paths = ResolvedPaths::resolve(self.locator)?;
        let description = DescriptionDocument::load(&paths.model, self.processor)?;

        log::info!(
            "Building bringup sequence (force={}, residuals={})",
            flags.force,
            flags.residuals
        );

        let mut body = vec![
            declare_flag(FORCE_ARG),
            declare_flag(RESIDUALS_ARG),
            include(paths.description_launch.clone()),
            include(paths.bridge_launch.clone()),
            force_plotter(),
            residual_plotter(),
            quadruped_controller(&paths, description),
            include(paths.gazebo_description_launch.clone()),
            gazebo_server(),
            gazebo_client(),
            Action::new(ActionKind::Timer {
                period: SPAWN_DELAY,
                actions: Vec::new(),
            }),
            spawner(),
        ];
        body.extend([POSITION_CONTROLLER, STATE_BROADCASTER].map(activate_controller));

        let mut launch = LaunchDescription::new(body);
        for (name, value) in flags.launch_arguments() {
            launch
                .launch_arguments
                .insert(name.to_string(), value.to_string());
        }
        Ok(launch)
    }
}

fn declare_flag(name: &str) -> Action {
    Action::new(ActionKind::DeclareArgument {
        name: name.to_string(),
        default: Some("false".to_string()),
        description: Some("Launch extra nodes if true".to_string()),
    })
}

fn include(file: PathBuf) -> Action {
    Action::new(ActionKind::Include { file })
}

fn plot_node(executable: &str, emulate_tty: bool, params: Vec<ParamDecl>, flag: &str) -> Action {
    let node = NodeDecl {
        emulate_tty,
        params,
        ..NodeDecl::new(PLOT_PACKAGE, executable)
    };
    Action::new(ActionKind::SpawnNode(node))
        .with_condition(Condition::If(Expr::configuration(flag)))
}

fn force_plotter() -> Action {
    plot_node(
        FORCE_PLOTTER,
        true,
        vec![
            ParamDecl::new("autoscale", true),
            ParamDecl::new("listening", true),
        ],
        FORCE_ARG,
    )
}

fn residual_plotter() -> Action {
    plot_node(
        RESIDUAL_PLOTTER,
        false,
        vec![
            ParamDecl::new("autoscale", true),
            ParamDecl::new("listening", true),
            ParamDecl::new("x_lim", 3000_i64),
        ],
        RESIDUALS_ARG,
    )
}

fn quadruped_controller(paths: &ResolvedPaths, description: DescriptionDocument) -> Action {
    let node = NodeDecl {
        output: Some(SCREEN.to_string()),
        params: vec![
            ParamDecl::new("use_sim_time", false),
            ParamDecl::new("gazebo", true),
            ParamDecl::new("publish_joint_states", false),
            ParamDecl::new("publish_joint_control", true),
            ParamDecl::new("publish_foot_contacts", true),
            ParamDecl::new("joint_controller_topic", JOINT_CONTROLLER_TOPIC),
            ParamDecl::new("loop_rate", LOOP_RATE),
            ParamDecl::new("urdf", description.into_string()),
        ],
        param_files: vec![
            paths.joints_config.clone(),
            paths.links_config.clone(),
            paths.gait_config.clone(),
        ],
        remaps: vec![RemapDecl {
            from: "/cmd_vel/smooth".to_string(),
            to: "/cmd_vel".to_string(),
        }],
        ..NodeDecl::new(CONTROLLER_PACKAGE, CONTROLLER_EXECUTABLE)
    };
    Action::new(ActionKind::SpawnNode(node))
}

fn process(cmd: Vec<String>) -> Action {
    Action::new(ActionKind::ExecuteProcess(ProcessDecl {
        cmd,
        output: Some(SCREEN.to_string()),
    }))
}

fn gazebo_server() -> Action {
    let mut cmd = vec![GAZEBO_SERVER.to_string()];
    for plugin in GAZEBO_PLUGINS {
        cmd.push("-s".to_string());
        cmd.push(plugin.to_string());
    }
    process(cmd)
}

fn gazebo_client() -> Action {
    process(vec![GAZEBO_CLIENT.to_string()])
}

fn spawner() -> Action {
    let mut arguments: Vec<String> = ["-entity", ENTITY_NAME, "-topic", DESCRIPTION_TOPIC]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for (flag, value) in SPAWN_POSE {
        arguments.push(flag.to_string());
        arguments.push(value.to_string());
    }

    let node = NodeDecl {
        output: Some(SCREEN.to_string()),
        arguments,
        ..NodeDecl::new(SPAWNER_PACKAGE, SPAWNER_EXECUTABLE)
    };
    Action::new(ActionKind::SpawnNode(node))
}

fn activate_controller(controller: &str) -> Action {
    process(
        ["ros2", "control", "load_controller", "--set-state", "active", controller]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
}
