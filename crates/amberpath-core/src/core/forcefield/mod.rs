//! # Forcefield Module
//!
//! Energy evaluation is owned by external force-field components. This module only defines
//! the seam they plug into ([`potential::Potential`]) plus a topology-only stand-in for
//! workflows that never evaluate energies.

pub mod potential;
