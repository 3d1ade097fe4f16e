//! Command-line and record generation

use crate::{
    ament::PackageLocator,
    error::GenerationError,
    file_cache::read_file_cached,
    ir::{Action, ActionKind, LaunchDescription, NodeDecl, ProcessDecl},
    params::load_param_file,
    record::types::{ArgumentRecord, IncludeRecord, NodeRecord, RecordJson, TimerRecord},
    substitution::{ArgumentMetadata, LaunchContext},
};
use std::path::Path;

/// Evaluate `launch` under its own launch arguments and produce the records
/// an executor needs. Inactive actions are left out.
pub fn generate_record(
    launch: &LaunchDescription,
    locator: &dyn PackageLocator,
) -> Result<RecordJson, GenerationError> {
    let mut generator = RecordGenerator {
        locator,
        context: LaunchContext::with_overrides(
            launch
                .launch_arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        ),
        record: RecordJson::new(),
    };

    for action in &launch.body {
        generator.evaluate_action(action, None)?;
    }
    generator.record_arguments();

    log::info!(
        "Generated {} nodes, {} includes, {} timers",
        generator.record.node.len(),
        generator.record.include.len(),
        generator.record.timer.len()
    );
    Ok(generator.record)
}

struct RecordGenerator<'a> {
    locator: &'a dyn PackageLocator,
    context: LaunchContext,
    record: RecordJson,
}

impl RecordGenerator<'_> {
    fn record_arguments(&mut self) {
        self.record.argument = self
            .context
            .declared_arguments()
            .iter()
            .map(|arg| ArgumentRecord {
                name: arg.name.clone(),
                default: arg.default.clone(),
                description: arg.description.clone(),
                value: self.context.get_configuration(&arg.name),
            })
            .collect();
    }

    fn evaluate_action(
        &mut self,
        action: &Action,
        delay: Option<f64>,
    ) -> Result<(), GenerationError> {
        if !action.is_active(&self.context)? {
            log::debug!("Skipping {} due to condition", action.kind.type_name());
            return Ok(());
        }

        match &action.kind {
            ActionKind::DeclareArgument {
                name,
                default,
                description,
            } => {
                self.context.declare_argument(ArgumentMetadata {
                    name: name.clone(),
                    default: default.clone(),
                    description: description.clone(),
                });
            }

            ActionKind::Include { file } => {
                log::info!("Including launch file: {}", file.display());
                self.record.include.push(IncludeRecord {
                    file: file.display().to_string(),
                });
            }

            ActionKind::SpawnNode(node) => {
                let mut record = CommandGenerator::generate_node_record(node, self.locator)?;
                record.delay = delay;
                for path in &record.params_files {
                    match read_file_cached(Path::new(path)) {
                        Ok(content) => {
                            self.record.file_data.insert(path.clone(), content);
                        }
                        Err(e) => log::warn!("Failed to read parameter file {}: {}", path, e),
                    }
                }
                self.record.node.push(record);
            }

            ActionKind::ExecuteProcess(process) => {
                let mut record = CommandGenerator::generate_process_record(process)?;
                record.delay = delay;
                self.record.node.push(record);
            }

            ActionKind::Timer { period, actions } => {
                self.record.timer.push(TimerRecord {
                    period: *period,
                    node_index: self.record.node.len(),
                });
                let nested_delay = Some(delay.unwrap_or(0.0) + period);
                for nested in actions {
                    self.evaluate_action(nested, nested_delay)?;
                }
            }
        }
        Ok(())
    }
}

pub struct CommandGenerator;

impl CommandGenerator {
    pub fn generate_node_record(
        node: &NodeDecl,
        locator: &dyn PackageLocator,
    ) -> Result<NodeRecord, GenerationError> {
        let cmd = Self::generate_node_command(node, locator);

        let mut params: Vec<(String, String)> = node
            .params
            .iter()
            .map(|p| (p.name.clone(), p.value.to_string()))
            .collect();

        // Load parameters from file and merge with inline params
        let mut params_files = Vec::new();
        for path in &node.param_files {
            params_files.push(path.display().to_string());
            match load_param_file(path) {
                Ok(file_params) => params.extend(file_params),
                Err(e) => {
                    log::warn!("Failed to load parameter file {}: {}", path.display(), e);
                }
            }
        }

        let remaps = node
            .remaps
            .iter()
            .map(|r| (r.from.clone(), r.to.clone()))
            .collect();

        Ok(NodeRecord {
            executable: node.executable.clone(),
            package: Some(node.package.clone()),
            name: Some(
                node.name
                    .clone()
                    .unwrap_or_else(|| node_name_from_executable(&node.executable)),
            ),
            params,
            params_files,
            remaps,
            args: if node.arguments.is_empty() {
                None
            } else {
                Some(node.arguments.clone())
            },
            cmd,
            output: node.output.clone(),
            emulate_tty: node.emulate_tty,
            delay: None,
        })
    }

    pub fn generate_node_command(node: &NodeDecl, locator: &dyn PackageLocator) -> Vec<String> {
        let mut cmd = Vec::new();

        // 1. Executable path
        cmd.push(Self::resolve_executable_path(
            &node.package,
            &node.executable,
            locator,
        ));

        // 2. Plain arguments precede the ROS arguments
        cmd.extend(node.arguments.iter().cloned());

        // 3. ROS args delimiter
        cmd.push("--ros-args".to_string());

        // 4. Node name
        if let Some(name) = &node.name {
            cmd.push("-r".to_string());
            cmd.push(format!("__node:={}", name));
        }

        // 5. Remappings
        for remap in &node.remaps {
            cmd.push("-r".to_string());
            cmd.push(format!("{}:={}", remap.from, remap.to));
        }

        // 6. Parameters
        for param in &node.params {
            cmd.push("-p".to_string());
            cmd.push(format!("{}:={}", param.name, param.value));
        }

        // 7. Parameter files
        for path in &node.param_files {
            cmd.push("--params-file".to_string());
            cmd.push(path.display().to_string());
        }

        cmd
    }

    fn resolve_executable_path(
        package: &str,
        executable: &str,
        locator: &dyn PackageLocator,
    ) -> String {
        match locator.package_lib_directory(package) {
            Some(lib_dir) => lib_dir.join(executable).display().to_string(),
            None => {
                log::warn!(
                    "Package {} not found; leaving {} to be resolved on PATH",
                    package,
                    executable
                );
                executable.to_string()
            }
        }
    }

    pub fn generate_process_record(process: &ProcessDecl) -> Result<NodeRecord, GenerationError> {
        let (program, args) = process
            .cmd
            .split_first()
            .ok_or(GenerationError::EmptyCommand)?;

        Ok(NodeRecord {
            executable: program.clone(),
            package: None, // Processes don't have packages
            name: Some(program.clone()),
            params: Vec::new(),
            params_files: Vec::new(),
            remaps: Vec::new(),
            args: if args.is_empty() {
                None
            } else {
                Some(args.to_vec())
            },
            cmd: process.cmd.clone(),
            output: process.output.clone(),
            emulate_tty: false,
            delay: None,
        })
    }
}

/// `spawn_entity.py` becomes `spawn_entity`, as ROS does for script nodes
fn node_name_from_executable(executable: &str) -> String {
    executable
        .strip_suffix(".py")
        .unwrap_or(executable)
        .to_string()
}
