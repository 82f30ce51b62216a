//! User form controller: draft state, validation, and the submit flow.
//!
//! DESIGN
//! ======
//! Mirrors reactive-form semantics: every control tracks `dirty`/`touched`
//! flags, and a rule failure is only *displayed* after interaction, so a
//! freshly rendered form shows no errors. Submission with any failing rule
//! marks every field touched to surface all errors at once.
//!
//! The confirmation field is special-cased: its display check compares the
//! live password pair whenever the field has been visited, independent of
//! the rule set, and a mismatch discovered at submit time is recorded on the
//! field until the user edits it again.
//!
//! The save itself is a timer-based stand-in; the persistence service is an
//! external collaborator that is not wired up yet.

#[cfg(test)]
#[path = "usuario_test.rs"]
mod usuario_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::{Catalogo, Departamento};
use super::field::Field;

const CEDULA_LEN: usize = 10;
const PASSWORD_MIN_LEN: usize = 6;
const SIMULATED_SAVE_MS: u64 = 1000;
const USUARIOS_ROUTE: &str = "/usuarios";

// =============================================================================
// TYPES
// =============================================================================

/// Identifier for each control in the user form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Campo {
    Nombres,
    Apellidos,
    Cedula,
    Telefono,
    Email,
    Direccion,
    Departamento,
    Cargo,
    Rol,
    Password,
    ConfirmPassword,
}

impl Campo {
    /// Every control in form order.
    pub const ALL: [Self; 11] = [
        Self::Nombres,
        Self::Apellidos,
        Self::Cedula,
        Self::Telefono,
        Self::Email,
        Self::Direccion,
        Self::Departamento,
        Self::Cargo,
        Self::Rol,
        Self::Password,
        Self::ConfirmPassword,
    ];
}

/// Result of a submit attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A validation rule failed; every field was marked touched and nothing
    /// was sent.
    Invalid,
    /// Rules passed but the password pair differs (create mode); the error
    /// was recorded on the confirmation field and nothing was sent.
    PasswordMismatch,
    /// The simulated save completed and navigation was triggered.
    Saved,
}

/// A user record as loaded into the form in edit mode and produced as the
/// save payload.
///
/// Credential fields are deliberately absent: passwords never leave the
/// form except through a real persistence call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsuarioRecord {
    pub nombres: String,
    pub apellidos: String,
    pub cedula: String,
    pub telefono: String,
    pub email: String,
    pub direccion: String,
    pub departamento: String,
    pub cargo: String,
    pub rol: String,
    pub activo: bool,
}

// =============================================================================
// FORM CONTROLLER
// =============================================================================

/// Create/edit form for a municipal system user.
#[derive(Clone, Debug)]
pub struct UsuarioForm {
    catalogo: Catalogo,
    editing: bool,
    usuario_id: Option<String>,
    nombres: Field,
    apellidos: Field,
    cedula: Field,
    telefono: Field,
    email: Field,
    direccion: Field,
    departamento: Field,
    cargo: Field,
    rol: Field,
    password: Field,
    confirm_password: Field,
    activo: bool,
    saving: bool,
    departamentos_filtrados: Vec<Departamento>,
    confirm_mismatch: bool,
}

impl UsuarioForm {
    /// A blank form in create mode: credentials required, user active.
    #[must_use]
    pub fn new(catalogo: Catalogo) -> Self {
        Self {
            catalogo,
            editing: false,
            usuario_id: None,
            nombres: Field::new(),
            apellidos: Field::new(),
            cedula: Field::new(),
            telefono: Field::new(),
            email: Field::new(),
            direccion: Field::new(),
            departamento: Field::new(),
            cargo: Field::new(),
            rol: Field::new(),
            password: Field::new(),
            confirm_password: Field::new(),
            activo: true,
            saving: false,
            departamentos_filtrados: Vec::new(),
            confirm_mismatch: false,
        }
    }

    /// A form in edit mode for `usuario_id`: credential fields carry no
    /// rules. Call [`UsuarioForm::load`] to prefill the draft.
    #[must_use]
    pub fn for_edit(catalogo: Catalogo, usuario_id: &str) -> Self {
        Self { editing: true, usuario_id: Some(usuario_id.to_owned()), ..Self::new(catalogo) }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    #[must_use]
    pub fn usuario_id(&self) -> Option<&str> {
        self.usuario_id.as_deref()
    }

    #[must_use]
    pub fn saving(&self) -> bool {
        self.saving
    }

    #[must_use]
    pub fn activo(&self) -> bool {
        self.activo
    }

    /// Current value of `campo`.
    #[must_use]
    pub fn value(&self, campo: Campo) -> &str {
        self.field(campo).value()
    }

    /// The catalog backing the select options.
    #[must_use]
    pub fn catalogo(&self) -> &Catalogo {
        &self.catalogo
    }

    /// Departments selectable for the currently chosen direction.
    #[must_use]
    pub fn departamentos_filtrados(&self) -> &[Departamento] {
        &self.departamentos_filtrados
    }

    /// Whether a submit attempt recorded a password mismatch that the user
    /// has not edited away yet.
    #[must_use]
    pub fn confirm_password_mismatch(&self) -> bool {
        self.confirm_mismatch
    }

    /// Display rule: whether `campo` should be rendered as invalid.
    ///
    /// True only after interaction (`dirty` or `touched`); a freshly
    /// rendered form is never flagged. The confirmation field instead
    /// compares the live password pair once it has been visited.
    #[must_use]
    pub fn is_field_invalid(&self, campo: Campo) -> bool {
        if campo == Campo::ConfirmPassword {
            return self.confirm_password.touched()
                && self.password.value() != self.confirm_password.value();
        }
        let field = self.field(campo);
        self.rule_error(campo) && (field.dirty() || field.touched())
    }

    /// Whether every rule passes, regardless of display state.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        Campo::ALL.iter().all(|campo| !self.rule_error(*campo))
    }

    /// Snapshot of the draft as a save payload.
    #[must_use]
    pub fn draft(&self) -> UsuarioRecord {
        UsuarioRecord {
            nombres: self.nombres.value().to_owned(),
            apellidos: self.apellidos.value().to_owned(),
            cedula: self.cedula.value().to_owned(),
            telefono: self.telefono.value().to_owned(),
            email: self.email.value().to_owned(),
            direccion: self.direccion.value().to_owned(),
            departamento: self.departamento.value().to_owned(),
            cargo: self.cargo.value().to_owned(),
            rol: self.rol.value().to_owned(),
            activo: self.activo,
        }
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Apply user input to `campo`, marking it dirty.
    ///
    /// Changing the direction re-filters the selectable departments and
    /// always clears any previously chosen department. Editing the
    /// confirmation drops a recorded mismatch, as re-running its rules would.
    pub fn set_value(&mut self, campo: Campo, value: &str) {
        self.field_mut(campo).set(value);
        match campo {
            Campo::Direccion => self.on_direccion_change(),
            Campo::ConfirmPassword => self.confirm_mismatch = false,
            _ => {}
        }
    }

    /// Mark `campo` visited, as a blur event would.
    pub fn touch(&mut self, campo: Campo) {
        self.field_mut(campo).touch();
    }

    pub fn set_activo(&mut self, activo: bool) {
        self.activo = activo;
    }

    /// Prefill the draft from a saved record without marking anything
    /// dirty or touched, then run the direction change hook.
    ///
    /// The hook re-filters the department list and, as in the interactive
    /// flow, resets the chosen department — the loaded value must be picked
    /// again.
    pub fn load(&mut self, usuario: &UsuarioRecord) {
        self.nombres.patch(&usuario.nombres);
        self.apellidos.patch(&usuario.apellidos);
        self.cedula.patch(&usuario.cedula);
        self.telefono.patch(&usuario.telefono);
        self.email.patch(&usuario.email);
        self.direccion.patch(&usuario.direccion);
        self.departamento.patch(&usuario.departamento);
        self.cargo.patch(&usuario.cargo);
        self.rol.patch(&usuario.rol);
        self.activo = usuario.activo;
        self.on_direccion_change();
    }

    // =========================================================================
    // SUBMIT
    // =========================================================================

    /// Validate and, if clean, run the simulated save and navigate away.
    ///
    /// * Any failing rule: every field is marked touched so errors render,
    ///   and nothing is sent.
    /// * Create mode with differing passwords: the mismatch is recorded on
    ///   the confirmation field and nothing is sent.
    /// * Otherwise: `saving` is set for the duration of the simulated save,
    ///   the draft is logged without credentials, and `navigate` receives
    ///   the listing route.
    pub async fn submit<F>(&mut self, navigate: F) -> SubmitOutcome
    where
        F: FnOnce(&str),
    {
        if !self.is_valid() {
            self.mark_all_touched();
            return SubmitOutcome::Invalid;
        }

        if !self.editing && self.password.value() != self.confirm_password.value() {
            self.confirm_mismatch = true;
            return SubmitOutcome::PasswordMismatch;
        }

        self.saving = true;
        tokio::time::sleep(Duration::from_millis(SIMULATED_SAVE_MS)).await;
        let draft = self.draft();
        info!(cedula = %draft.cedula, email = %draft.email, editing = self.editing, "usuario draft saved");
        self.saving = false;
        navigate(USUARIOS_ROUTE);
        SubmitOutcome::Saved
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn on_direccion_change(&mut self) {
        self.departamentos_filtrados = self.catalogo.departamentos_de(self.direccion.value());
        // Changing the direction always resets the chosen department.
        self.departamento.patch("");
    }

    fn mark_all_touched(&mut self) {
        for campo in Campo::ALL {
            self.field_mut(campo).touch();
        }
    }

    /// Whether the value of `campo` currently fails its rule set.
    fn rule_error(&self, campo: Campo) -> bool {
        let value = self.field(campo).value();
        match campo {
            Campo::Nombres | Campo::Apellidos | Campo::Direccion | Campo::Departamento | Campo::Rol => {
                value.is_empty()
            }
            Campo::Cedula => !cedula_is_valid(value),
            Campo::Email => !email_is_valid(value),
            Campo::Telefono | Campo::Cargo => false,
            Campo::Password => !self.editing && value.chars().count() < PASSWORD_MIN_LEN,
            Campo::ConfirmPassword => (!self.editing && value.is_empty()) || self.confirm_mismatch,
        }
    }

    fn field(&self, campo: Campo) -> &Field {
        match campo {
            Campo::Nombres => &self.nombres,
            Campo::Apellidos => &self.apellidos,
            Campo::Cedula => &self.cedula,
            Campo::Telefono => &self.telefono,
            Campo::Email => &self.email,
            Campo::Direccion => &self.direccion,
            Campo::Departamento => &self.departamento,
            Campo::Cargo => &self.cargo,
            Campo::Rol => &self.rol,
            Campo::Password => &self.password,
            Campo::ConfirmPassword => &self.confirm_password,
        }
    }

    fn field_mut(&mut self, campo: Campo) -> &mut Field {
        match campo {
            Campo::Nombres => &mut self.nombres,
            Campo::Apellidos => &mut self.apellidos,
            Campo::Cedula => &mut self.cedula,
            Campo::Telefono => &mut self.telefono,
            Campo::Email => &mut self.email,
            Campo::Direccion => &mut self.direccion,
            Campo::Departamento => &mut self.departamento,
            Campo::Cargo => &mut self.cargo,
            Campo::Rol => &mut self.rol,
            Campo::Password => &mut self.password,
            Campo::ConfirmPassword => &mut self.confirm_password,
        }
    }
}

// =============================================================================
// VALIDATION HELPERS
// =============================================================================

/// Exactly ten ASCII digits.
fn cedula_is_valid(cedula: &str) -> bool {
    cedula.len() == CEDULA_LEN && cedula.bytes().all(|b| b.is_ascii_digit())
}

/// Structural email check: one `@` with non-empty local and domain parts.
fn email_is_valid(email: &str) -> bool {
    let parts = email.split('@').collect::<Vec<_>>();
    parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty()
}
