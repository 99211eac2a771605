//! Console line parser for `folioctl run`.

use folio_core::{ClickTarget, Command, GalleryEvent, InputEvent, Key, Surface};
use folio_model::SlotPosition;

/// Swipe distance the console simulates; comfortably past the default
/// threshold.
const SWIPE_DISTANCE: f32 = 120.0;

pub const HELP: &str = "\
commands:
  next | n                 next project
  prev | p                 previous project
  go <index>               go to project
  thumb <project> <slot>   click a thumbnail (slot: primary, large, small-1, small-2)
  primary                  click the primary surface
  key <left|right|esc>     press a key
  swipe <left|right> [modal]
  close                    close the modal
  locale <code>            switch locale
  help
  quit | q";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleAction {
    Events(Vec<GalleryEvent>),
    Locale(String),
    Help,
    Quit,
    Nothing,
}

impl From<GalleryEvent> for ConsoleAction {
    fn from(event: GalleryEvent) -> Self {
        ConsoleAction::Events(vec![event])
    }
}

pub fn parse(line: &str) -> Result<ConsoleAction, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ConsoleAction::Nothing);
    };
    let args: Vec<&str> = words.collect();

    let action = match (verb, args.as_slice()) {
        ("next" | "n", []) => command(Command::NextProject),
        ("prev" | "p", []) => command(Command::PreviousProject),
        ("go", [index]) => command(Command::GoToProject(index_arg(index)?)),
        ("thumb", [project, slot]) => click(ClickTarget::Thumbnail {
            project: index_arg(project)?,
            position: slot_arg(slot)?,
        }),
        ("primary", []) => click(ClickTarget::PrimarySurface),
        ("key", [key]) => key_arg(key)?,
        ("swipe", [direction]) => swipe(direction, Surface::Primary)?,
        ("swipe", [direction, "modal"]) => swipe(direction, Surface::Modal)?,
        ("close", []) => click(ClickTarget::ModalClose),
        ("locale", [code]) => ConsoleAction::Locale((*code).to_string()),
        ("help" | "?", []) => ConsoleAction::Help,
        ("quit" | "q" | "exit", []) => ConsoleAction::Quit,
        _ => return Err(format!("unrecognised command: {}", line.trim())),
    };
    Ok(action)
}

fn command(command: Command) -> ConsoleAction {
    GalleryEvent::Command(command).into()
}

fn click(target: ClickTarget) -> ConsoleAction {
    GalleryEvent::Input(InputEvent::Click(target)).into()
}

fn index_arg(raw: &str) -> Result<usize, String> {
    raw.parse()
        .map_err(|_| format!("expected a project index, got '{raw}'"))
}

fn slot_arg(raw: &str) -> Result<SlotPosition, String> {
    std::iter::once(SlotPosition::Primary)
        .chain(SlotPosition::THUMBNAILS)
        .find(|position| position.label() == raw)
        .ok_or_else(|| format!("unknown slot '{raw}'"))
}

fn key_arg(raw: &str) -> Result<ConsoleAction, String> {
    let key = match raw {
        "left" => Key::ArrowLeft,
        "right" => Key::ArrowRight,
        "esc" | "escape" => Key::Escape,
        other => return Err(format!("unknown key '{other}'")),
    };
    Ok(GalleryEvent::Input(InputEvent::Key(key)).into())
}

fn swipe(direction: &str, surface: Surface) -> Result<ConsoleAction, String> {
    let dx = match direction {
        "left" => -SWIPE_DISTANCE,
        "right" => SWIPE_DISTANCE,
        other => return Err(format!("unknown swipe direction '{other}'")),
    };
    let (x, y) = (200.0, 100.0);
    Ok(ConsoleAction::Events(vec![
        GalleryEvent::Input(InputEvent::TouchStart { x, y, surface }),
        GalleryEvent::Input(InputEvent::TouchEnd { x: x + dx, y }),
    ]))
}
