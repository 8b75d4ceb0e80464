/// Anonymous visitor. Carries nothing; its presence is the information.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Lurker;
