
mod clock;
mod router;
