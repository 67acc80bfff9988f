mod common;
mod health;
mod routing;
