#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Open,
    Closed,
}

/// Visual/audible feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indication {
    Success,
    Error,
}

/// Servo/relay plus indicator. Calls return immediately.
pub trait Actuator {
    fn drive(&mut self, position: Position);
    fn indicate(&mut self, indication: Indication);
}

impl<T: Actuator + ?Sized> Actuator for Box<T> {
    fn drive(&mut self, position: Position) {
        (**self).drive(position);
    }

    fn indicate(&mut self, indication: Indication) {
        (**self).indicate(indication);
    }
}
