mod command;
mod registry;
mod serial;

pub(crate) use command::EventCommand;
pub(crate) use registry::SlotRegistry;
pub(crate) use serial::spawn_serial;
