use crate::actuator::{Actuator, Indication, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorEvent {
    Drive(Position),
    Indicate(Indication),
}

#[derive(Debug, Default)]
pub struct RecordingActuator {
    events: Vec<ActuatorEvent>,
}

impl RecordingActuator {
    pub fn events(&self) -> &[ActuatorEvent] {
        &self.events
    }

    /// Last commanded position, if any.
    pub fn position(&self) -> Option<Position> {
        self.events.iter().rev().find_map(|e| match e {
            ActuatorEvent::Drive(p) => Some(*p),
            ActuatorEvent::Indicate(_) => None,
        })
    }
}

impl Actuator for RecordingActuator {
    fn drive(&mut self, position: Position) {
        self.events.push(ActuatorEvent::Drive(position));
    }

    fn indicate(&mut self, indication: Indication) {
        self.events.push(ActuatorEvent::Indicate(indication));
    }
}
