// Domain layer: the leaderboard model, the ports the shell implements, and the
// pure scoring services.

pub mod model;
pub mod ports;
pub mod raw;

pub mod services;
