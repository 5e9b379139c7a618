//! Compound procedures built on the command client.
//!
//! Each workflow is a fixed linear chain of primitive operations. The first
//! step that comes back with a non-zero confirmation code stops the chain;
//! no later command is issued, nothing is retried, and nothing is rolled
//! back (a model fused but not stored simply stays un-stored). Link and
//! framing failures propagate as [`ZfmError`](crate::error::ZfmError);
//! device-reported conditions travel inside the returned outcome.

use crate::constants::FINGER_LIFT_DELAY_MS;
use crate::error::Result;
use crate::protocol::Zfm;
use crate::transport::Transport;
use crate::types::{
    ConfirmationCode, EnrollOutcome, MatchOutcome, SearchOutcome, StepFailure, WorkflowStep,
};
use log::{debug, info};
use std::thread;
use std::time::Duration;

/// Workflow sequencer over an exclusively borrowed client.
///
/// The mutable borrow guarantees the one-outstanding-command invariant for
/// the whole compound procedure.
pub struct Workflows<'a, T: Transport> {
    zfm: &'a mut Zfm<T>,
    finger_lift_delay: Duration,
}

impl<'a, T: Transport> Workflows<'a, T> {
    pub fn new(zfm: &'a mut Zfm<T>) -> Self {
        Workflows {
            zfm,
            finger_lift_delay: Duration::from_millis(FINGER_LIFT_DELAY_MS),
        }
    }

    /// Override the pause between the two enrolment captures.
    pub fn set_finger_lift_delay(&mut self, delay: Duration) {
        self.finger_lift_delay = delay;
    }

    /// Run one primitive step; `Some` means the chain must stop here.
    fn step(
        &mut self,
        step: WorkflowStep,
        op: impl FnOnce(&mut Zfm<T>) -> Result<ConfirmationCode>,
    ) -> Result<Option<StepFailure>> {
        let code = op(self.zfm)?;
        if code.is_success() {
            debug!("{} ok", step);
            Ok(None)
        } else {
            info!("{} failed: {}", step, code);
            Ok(Some(StepFailure::new(step, code)))
        }
    }

    /// Enrol a finger into library page `page_id`.
    ///
    /// Two capture/extract rounds (with a pause for the finger to be lifted
    /// and replaced), model fusion, then the store. A store refusal is
    /// reported distinctly from earlier failures: at that point the module
    /// has already fused a model, it just never reached flash.
    pub fn enroll(&mut self, page_id: u16) -> Result<EnrollOutcome> {
        info!("enrolling into page {}", page_id);

        if let Some(fail) = self.step(WorkflowStep::FirstCapture, |z| z.get_image())? {
            return Ok(EnrollOutcome::Aborted(fail));
        }
        if let Some(fail) = self.step(WorkflowStep::FirstExtract, |z| z.gen_char(1))? {
            return Ok(EnrollOutcome::Aborted(fail));
        }

        info!("lift and replace the finger");
        thread::sleep(self.finger_lift_delay);

        if let Some(fail) = self.step(WorkflowStep::SecondCapture, |z| z.get_image())? {
            return Ok(EnrollOutcome::Aborted(fail));
        }
        if let Some(fail) = self.step(WorkflowStep::SecondExtract, |z| z.gen_char(2))? {
            return Ok(EnrollOutcome::Aborted(fail));
        }
        if let Some(fail) = self.step(WorkflowStep::FuseModel, |z| z.reg_model())? {
            return Ok(EnrollOutcome::Aborted(fail));
        }
        if let Some(fail) = self.step(WorkflowStep::StoreTemplate, |z| z.store(page_id, 1))? {
            return Ok(EnrollOutcome::StoreFailed(fail));
        }

        info!("template stored at page {}", page_id);
        Ok(EnrollOutcome::Stored { page_id })
    }

    /// Capture a live finger and search `num_pages` pages from `start_page`
    /// for it. A clean exchange where the module finds nothing is a
    /// `NoMatch`, not an abort.
    pub fn search_identify(&mut self, start_page: u16, num_pages: u16) -> Result<SearchOutcome> {
        if let Some(fail) = self.step(WorkflowStep::Capture, |z| z.get_image())? {
            return Ok(SearchOutcome::Aborted(fail));
        }
        if let Some(fail) = self.step(WorkflowStep::Extract, |z| z.gen_char(1))? {
            return Ok(SearchOutcome::Aborted(fail));
        }

        let (code, hit) = self.zfm.search(1, start_page, num_pages)?;
        match hit {
            Some(hit) => {
                info!("match at page {} (score {})", hit.page_id, hit.score);
                Ok(SearchOutcome::Match(hit))
            }
            None => {
                info!("no match: {}", code);
                Ok(SearchOutcome::NoMatch(code))
            }
        }
    }

    /// Capture a live finger and compare it against the template stored at
    /// `page_id`.
    pub fn identify_by_id(&mut self, page_id: u16) -> Result<MatchOutcome> {
        if let Some(fail) = self.step(WorkflowStep::Capture, |z| z.get_image())? {
            return Ok(MatchOutcome::Aborted(fail));
        }
        if let Some(fail) = self.step(WorkflowStep::Extract, |z| z.gen_char(1))? {
            return Ok(MatchOutcome::Aborted(fail));
        }
        if let Some(fail) = self.step(WorkflowStep::LoadTemplate, |z| z.load_char(page_id, 2))? {
            return Ok(MatchOutcome::Aborted(fail));
        }

        let (code, score) = self.zfm.match_buffers(1, 2)?;
        match score {
            Some(score) => {
                info!("finger matches page {} (score {})", page_id, score);
                Ok(MatchOutcome::Match { score })
            }
            None => {
                info!("no match against page {}: {}", page_id, code);
                Ok(MatchOutcome::NoMatch(code))
            }
        }
    }

    /// Delete `count` consecutive templates starting at `page_id`. Single
    /// round trip; the code is handed back as-is.
    pub fn delete(&mut self, page_id: u16, count: u8) -> Result<ConfirmationCode> {
        let code = self.zfm.delete_char(page_id, count)?;
        if code.is_success() {
            info!("deleted {} template(s) from page {}", count, page_id);
        } else {
            info!("delete from page {} failed: {}", page_id, code);
        }
        Ok(code)
    }
}
