use std::fmt;
use std::slice;

use log::debug;
use nix::unistd::Pid;

use crate::{
    core::job::{Job, JobStatus, Mode},
    errors::{Error, Result},
};

/// The jobs the shell is responsible for, in the order they were launched.
#[derive(Default)]
pub struct JobTable {
    jobs: Vec<Job>,
}

impl JobTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Start tracking a freshly forked process. Must be called before the
    /// process is waited on.
    pub fn save(
        &mut self,
        pid: Pid,
        argv: Vec<String>,
        status: JobStatus,
        mode: Mode,
    ) -> Result<&Job> {
        if self.contains(pid) {
            return Err(Error::duplicate_job(pid));
        }

        debug!("tracking [{}] {:?} as {:?}", pid, argv, mode);
        self.jobs.push(Job::new(pid, argv, status, mode));
        Ok(&self.jobs[self.jobs.len() - 1])
    }

    pub fn set_status(&mut self, pid: Pid, status: JobStatus) -> Result<()> {
        let job_index = self.find_job(pid).ok_or_else(|| Error::no_such_job(pid))?;
        self.jobs[job_index].set_status(status);
        Ok(())
    }

    /// Stop tracking a job, handing it back to the caller.
    pub fn delete(&mut self, pid: Pid) -> Result<Job> {
        let job_index = self.find_job(pid).ok_or_else(|| Error::no_such_job(pid))?;
        debug!("no longer tracking [{}]", pid);
        Ok(self.jobs.remove(job_index))
    }

    pub fn get(&self, pid: Pid) -> Option<&Job> {
        self.find_job(pid).map(|job_index| &self.jobs[job_index])
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.find_job(pid).is_some()
    }

    pub fn iter(&self) -> slice::Iter<'_, Job> {
        self.jobs.iter()
    }

    /// Visit every job present when the pass starts, oldest first.
    ///
    /// The visitor receives the table itself and may update or delete any
    /// job. Jobs deleted earlier in the pass are not visited.
    pub fn iterate<F>(&mut self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&mut JobTable, Pid) -> Result<()>,
    {
        let snapshot: Vec<Pid> = self.jobs.iter().map(Job::pid).collect();
        for pid in snapshot {
            if self.contains(pid) {
                visitor(self, pid)?;
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn clear(&mut self) {
        debug!("releasing {} jobs", self.jobs.len());
        self.jobs.clear();
    }

    fn find_job(&self, pid: Pid) -> Option<usize> {
        self.jobs.iter().position(|job| job.pid() == pid)
    }
}

impl<'a> IntoIterator for &'a JobTable {
    type Item = &'a Job;
    type IntoIter = slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for JobTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} jobs", self.jobs.len())?;
        for job in &self.jobs {
            writeln!(f, "{:?}", job)?;
        }

        Ok(())
    }
}
